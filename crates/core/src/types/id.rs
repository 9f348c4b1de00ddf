//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `generate()` producing a fresh UUID v4 based id, optionally prefixed
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use wholesale_core::define_id;
/// define_id!(CouponId, "CPN");
/// define_id!(SupplierId);
///
/// let coupon = CouponId::generate();
/// assert!(coupon.as_str().starts_with("CPN-"));
///
/// let supplier = SupplierId::new("42");
/// assert_eq!(supplier.to_string(), "42");
///
/// // These are different types, so this won't compile:
/// // let _: SupplierId = coupon;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        $crate::define_id!(@impl $name, |uuid: ::uuid::Uuid| uuid.to_string());
    };
    ($name:ident, $prefix:literal) => {
        $crate::define_id!(@impl $name, |uuid: ::uuid::Uuid| {
            format!("{}-{}", $prefix, uuid.simple()).to_uppercase()
        });
    };
    (@impl $name:ident, $render:expr) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh, collision-resistant ID.
            #[must_use]
            pub fn generate() -> Self {
                let render = $render;
                Self(render(::uuid::Uuid::new_v4()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(OrderId, "ORD");
define_id!(CustomerId, "CUST");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefixed_ids() {
        assert!(OrderId::generate().as_str().starts_with("ORD-"));
        assert!(CustomerId::generate().as_str().starts_with("CUST-"));
    }

    #[test]
    fn test_plain_product_id_is_uuid() {
        let id = ProductId::generate();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap_or_default(), "\"7\"");
    }
}
