//! Placeholder resolution - `${name}` substitution
//!
//! Syntax:
//! - `${name}` is replaced by the property value
//! - `${name:default}` falls back to `default` when the property is missing
//! - `\${name}` is never replaced (the backslash stays in the output)
//!
//! A frame is the placeholder plus the byte in front of it, which must not
//! be a backslash. Only the placeholder itself (the capture group) is
//! rewritten, via [`replace_submatches`]. Substituted values are never
//! scanned again.
//!
//! Input is scanned as raw bytes, so text that is not valid UTF-8 passes
//! through untouched. Names and defaults are decoded lossily for lookup and
//! reporting only.
//!
//! Because a frame owns its leading byte, a placeholder written right after
//! another one (`${a}${b}`) has nothing of its own left and is not matched.

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tracing::{debug, warn};

use crate::error::SubstError;
use crate::limits::SubstitutionLimits;
use crate::properties::PropertyStore;
use crate::report::SubstitutionReport;
use crate::rewriter::replace_submatches;

/// Start of input or a non-backslash byte, then `${name}` or `${name:default}`.
/// Inside the default, `\x` (for instance `\}`) is kept as two literal bytes.
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u)(?:\A|[^\\])(\$\{\s*[A-Za-z0-9._-]+\s*(?::(?:[^\\}]|\\.)*)?\})").unwrap()
});

/// One placeholder found during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Exact placeholder text, `${` and `}` included
    pub raw_text: String,
    pub name: String,
    /// `None` when no `:` was written; `Some("")` for `${name:}`
    pub default: Option<String>,
    /// Value substituted in, if any
    pub resolved_value: Option<String>,
    /// True only when a property (not a default) supplied the value
    pub resolved: bool,
}

impl Occurrence {
    /// Split a raw `${...}` placeholder into name and default
    pub fn parse(raw: &str) -> Self {
        let raw_text = raw.trim();
        let body = raw_text
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(raw_text);

        let (name, default) = match body.split_once(':') {
            Some((name, default)) => (name, Some(default.to_string())),
            None => (body, None),
        };

        Self {
            raw_text: raw_text.to_string(),
            name: name.trim().to_string(),
            default,
            resolved_value: None,
            resolved: false,
        }
    }

    /// Resolve against the store: property first, then the default
    pub fn resolve(&mut self, store: &PropertyStore) {
        if let Some(value) = store.get(&self.name) {
            self.resolved_value = Some(value.to_string());
            self.resolved = true;
        } else {
            self.resolved_value = self.default.clone();
            self.resolved = false;
        }
    }
}

/// Default bytes of a raw `${name:default}`, exactly as written
fn raw_default(raw: &[u8]) -> Option<&[u8]> {
    let body = raw.strip_prefix(b"${")?.strip_suffix(b"}")?;
    let colon = body.iter().position(|&b| b == b':')?;
    Some(&body[colon + 1..])
}

/// Outcome of one scan
#[derive(Debug)]
pub struct Resolution {
    /// Fully rewritten bytes, computed even when `error` is set
    pub output: Vec<u8>,
    pub report: SubstitutionReport,
    /// Strict-mode failure for the most recently seen missing property
    pub error: Option<SubstError>,
    /// Every missing property name, in scan order
    pub missing: Vec<String>,
}

/// Resolves placeholders in text against a property store
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderResolver<'a> {
    store: &'a PropertyStore,
    strict: bool,
    limits: SubstitutionLimits,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(store: &'a PropertyStore) -> Self {
        Self {
            store,
            strict: false,
            limits: SubstitutionLimits::default(),
        }
    }

    /// Fail when a placeholder's property is missing from the store
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn limits(mut self, limits: SubstitutionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Rewrite every placeholder in `input`
    pub fn resolve<T: AsRef<[u8]> + ?Sized>(&self, input: &T) -> Resolution {
        let mut report = SubstitutionReport::new();
        let mut error = None;
        let mut missing = Vec::new();

        let output = replace_submatches(
            &PLACEHOLDER_RE,
            input.as_ref(),
            self.limits.max_frames,
            |groups| {
                groups
                    .iter()
                    .map(|&raw| {
                        let mut occurrence = Occurrence::parse(&String::from_utf8_lossy(raw));
                        occurrence.resolve(self.store);

                        if !occurrence.resolved {
                            if occurrence.default.is_some() {
                                debug!(property = %occurrence.name, "property not found, using default");
                            } else {
                                warn!(property = %occurrence.name, "property not found");
                            }
                            if self.strict {
                                error = Some(SubstError::PropertyNotFound {
                                    name: occurrence.name.clone(),
                                });
                            }
                            missing.push(occurrence.name.clone());
                        }

                        let Some(value) = occurrence.resolved_value else {
                            // Keep original text if not found
                            return raw.to_vec();
                        };
                        debug!(placeholder = %occurrence.raw_text, value = %value, "substituted");
                        let replacement = if occurrence.resolved {
                            value.as_bytes().to_vec()
                        } else {
                            raw_default(raw).unwrap_or(value.as_bytes()).to_vec()
                        };
                        report.record(occurrence.raw_text, value);
                        replacement
                    })
                    .collect()
            },
        );

        Resolution {
            output,
            report,
            error,
            missing,
        }
    }
}

/// Convenience function for resolving placeholders in one input
pub fn substitute<T: AsRef<[u8]> + ?Sized>(
    store: &PropertyStore,
    input: &T,
    strict: bool,
    limits: SubstitutionLimits,
) -> Resolution {
    PlaceholderResolver::new(store)
        .strict(strict)
        .limits(limits)
        .resolve(input)
}
