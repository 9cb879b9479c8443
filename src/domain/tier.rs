use std::fmt;
use std::str::FromStr;

use super::error::AppError;
use super::table::FileFormat;

/// Service level that decides which analysis steps run for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    #[default]
    Standard,
    Plus,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Standard, Tier::Plus, Tier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Standard => "standard",
            Tier::Plus => "plus",
            Tier::Premium => "premium",
        }
    }

    /// Resolve an optional selector; an absent or blank selector means `Standard`.
    pub fn from_selector(selector: Option<&str>) -> Result<Self, AppError> {
        match selector.map(str::trim) {
            None | Some("") => Ok(Tier::default()),
            Some(value) => value.parse(),
        }
    }

    /// File formats this tier is willing to load.
    pub fn accepted_formats(&self) -> &'static [FileFormat] {
        match self {
            Tier::Standard => &[FileFormat::Xlsx, FileFormat::Xls, FileFormat::Csv],
            Tier::Plus | Tier::Premium => &[FileFormat::Csv, FileFormat::Xlsx],
        }
    }

    pub fn accepts(&self, format: FileFormat) -> bool {
        self.accepted_formats().contains(&format)
    }

    /// Human-readable extension list, e.g. `.csv or .xlsx`.
    pub fn accepted_extensions(&self) -> String {
        let exts: Vec<String> = self
            .accepted_formats()
            .iter()
            .map(|f| format!(".{}", f.extension()))
            .collect();
        match exts.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }
}

impl FromStr for Tier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Tier::Standard),
            "plus" => Ok(Tier::Plus),
            "premium" => Ok(Tier::Premium),
            _ => Err(AppError::InvalidTier(s.to_string())),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
