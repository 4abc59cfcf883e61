//! Key manager resources implementing the [`Resource`](resource_framework::Resource) trait.
//!
//! Every kind gets a `String`-backed id newtype (`ContainerId`, `OrderId`, `SecretId`)
//! from [`resource_id!`]. The same macro implements `IntoResourceId` so proxy methods
//! accept an id, a plain string, or the resource itself.

pub mod container;
pub mod order;
pub mod secret;

pub use container::*;
pub use order::*;
pub use secret::*;

/// Generates the id newtype for a resource kind plus its `IntoResourceId` conversions.
///
/// `resource_id!(Secret)` produces `SecretId` and lets `SecretId`, `&SecretId`, `&str`,
/// `String`, `Secret` and `&Secret` stand in wherever a secret id is expected. A resource
/// without a reference URL converts to [`SessionError::MissingId`].
///
/// [`SessionError::MissingId`]: resource_framework::SessionError::MissingId
macro_rules! resource_id {
    ($($kind:ident),+ $(,)?) => {
        paste::paste! {
            $(
                /// Identifier of a resource, the last segment of its reference URL.
                #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
                #[serde(transparent)]
                pub struct [<$kind Id>](pub String);

                impl From<String> for [<$kind Id>] {
                    fn from(id: String) -> Self {
                        Self(id)
                    }
                }

                impl From<&str> for [<$kind Id>] {
                    fn from(id: &str) -> Self {
                        Self(id.to_owned())
                    }
                }

                impl std::fmt::Display for [<$kind Id>] {
                    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        f.write_str(&self.0)
                    }
                }

                impl AsRef<str> for [<$kind Id>] {
                    fn as_ref(&self) -> &str {
                        &self.0
                    }
                }

                impl resource_framework::IntoResourceId<$kind> for [<$kind Id>] {
                    fn into_resource_id(self) -> Result<[<$kind Id>], resource_framework::SessionError> {
                        Ok(self)
                    }
                }

                impl resource_framework::IntoResourceId<$kind> for &[<$kind Id>] {
                    fn into_resource_id(self) -> Result<[<$kind Id>], resource_framework::SessionError> {
                        Ok(self.clone())
                    }
                }

                impl resource_framework::IntoResourceId<$kind> for &str {
                    fn into_resource_id(self) -> Result<[<$kind Id>], resource_framework::SessionError> {
                        Ok(self.into())
                    }
                }

                impl resource_framework::IntoResourceId<$kind> for String {
                    fn into_resource_id(self) -> Result<[<$kind Id>], resource_framework::SessionError> {
                        Ok(self.into())
                    }
                }

                impl resource_framework::IntoResourceId<$kind> for &$kind {
                    fn into_resource_id(self) -> Result<[<$kind Id>], resource_framework::SessionError> {
                        resource_framework::Resource::id(self).ok_or(
                            resource_framework::SessionError::MissingId {
                                resource: <$kind as resource_framework::Resource>::KIND,
                            },
                        )
                    }
                }

                impl resource_framework::IntoResourceId<$kind> for $kind {
                    fn into_resource_id(self) -> Result<[<$kind Id>], resource_framework::SessionError> {
                        resource_framework::IntoResourceId::<$kind>::into_resource_id(&self)
                    }
                }
            )+
        }
    };
}

resource_id!(Container, Order, Secret);
