//! # Transform Passes
//!
//! Each pass is one tree-rewriting stage of the pipeline. Passes are total:
//! malformed markers, missing files and odd indentation all degrade to a
//! pass-through or an empty result, never an error.
//!
//! ## Passes
//!
//! - **`typography`**: `[key!]` color-step markers on strong/emphasis/code
//! - **`list_variant`**: list levels, ordinals and counter scopes
//! - **`math_header`**: trims inline math inside headings
//! - **`heading_ids`**: one de-duplicated slug per heading
//! - **`github_alert`**: `[!TYPE]` blockquotes become alerts
//! - **`code_import`**: fills code fences from source files
//!
//! Per-document state (counter ids, taken slugs) lives in [`RenderContext`],
//! created fresh for every document so nothing leaks between renders.

pub mod code_import;
pub mod github_alert;
pub mod heading_ids;
pub mod list_variant;
pub mod math_header;
pub mod typography;

use std::fmt;
use std::str::FromStr;

use crate::slug::Slugger;
use crate::tree::Node;
use list_variant::CounterAllocator;

pub use code_import::CodeImportPass;
pub use github_alert::GithubAlertPass;
pub use heading_ids::HeadingIdPass;
pub use list_variant::ListVariantPass;
pub use math_header::MathHeaderPass;
pub use typography::TypographyPass;

/// State scoped to one document render.
#[derive(Debug)]
pub struct RenderContext {
    pub counters: CounterAllocator,
    pub slugger: Slugger,
}

impl RenderContext {
    pub fn new(counter_prefix: &str) -> Self {
        Self {
            counters: CounterAllocator::new(counter_prefix),
            slugger: Slugger::default(),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(list_variant::DEFAULT_COUNTER_PREFIX)
    }
}

/// One stage of the pipeline.
pub trait Pass: Send + Sync {
    fn kind(&self) -> PassKind;

    fn run(&self, root: &mut Node, cx: &mut RenderContext);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PassKind {
    CodeImport,
    GithubAlert,
    Typography,
    ListVariant,
    MathHeader,
    HeadingIds,
}

impl PassKind {
    /// The order the default pipeline runs in.
    pub const DEFAULT_ORDER: [PassKind; 6] = [
        PassKind::CodeImport,
        PassKind::GithubAlert,
        PassKind::Typography,
        PassKind::ListVariant,
        PassKind::MathHeader,
        PassKind::HeadingIds,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassKind::CodeImport => "code-import",
            PassKind::GithubAlert => "github-alert",
            PassKind::Typography => "typography",
            PassKind::ListVariant => "list-variant",
            PassKind::MathHeader => "math-header",
            PassKind::HeadingIds => "heading-ids",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pass `{0}`")]
pub struct UnknownPass(pub String);

impl FromStr for PassKind {
    type Err = UnknownPass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PassKind::DEFAULT_ORDER
            .into_iter()
            .find(|k| k.name() == s.trim())
            .ok_or_else(|| UnknownPass(s.to_string()))
    }
}
