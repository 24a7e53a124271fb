use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        $(#[$meta])*
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Grouping {
    Main => "main",
    Frontend => "frontend",
});

str_enum!(#[derive(Default)] DocLanguage {
    #[default]
    English => "en",
    Russian => "ru",
});

str_enum!(#[derive(Default)] RunPhase {
    #[default]
    Idle => "idle",
    Running => "running",
    Completed => "completed",
});

str_enum!(FileStatus {
    Pending => "pending",
    Documented => "documented",
    Failed => "failed",
});

impl Grouping {
    /// Both groupings in processing order.
    pub fn all() -> &'static [Grouping] {
        &[Self::Main, Self::Frontend]
    }
}
