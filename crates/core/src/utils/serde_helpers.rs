//! Textual representation helpers for kind enums

/// Implements `Display`, case-insensitive `FromStr` and serde support for a
/// fieldless enum, mapping every variant to a fixed name.
///
/// Usage:
/// ```ignore
/// impl_kind_names!(
///     MyKind,
///     Variant1 => "variant1",
///     Variant2 => "variant2"
/// );
/// ```
#[macro_export]
macro_rules! impl_kind_names {
    ($enum_type:ty, $($variant:ident => $str_val:literal),+ $(,)?) => {
        impl $enum_type {
            /// Returns the textual name of the kind.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $str_val,
                    )+
                }
            }
        }

        impl std::fmt::Display for $enum_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_type {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $(
                        $str_val => Ok(Self::$variant),
                    )+
                    _ => Err($crate::error::Error::ConfigError(format!(
                        "not a valid kind: {:?}, expected one of: {}",
                        s,
                        [$($str_val),+].join(", ")
                    ))),
                }
            }
        }

        impl serde::Serialize for $enum_type {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_type {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
