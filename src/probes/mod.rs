//! # Probes
//!
//! Each probe is a stateless, deterministic generator: given a tool and the
//! scanner metadata dictionary, it returns zero or more [`TestCase`]s. The
//! registry below is a fixed ordered list — no dynamic discovery is
//! required or supported; a new probe is added by writing a module that
//! implements [`Probe`] and appending it here.

pub mod auth;
pub mod base;
pub mod cmd_injection;
pub mod dos;
pub mod path_traversal;
pub mod prompt_injection;
pub mod schema_confusion;
pub mod ssrf;

pub use base::{Probe, TestCase};
pub use prompt_injection::{PromptInjectionFinding, PromptInjectionProbe};

use auth::AuthProbe;
use cmd_injection::CmdInjectionProbe;
use dos::DoSProbe;
use path_traversal::PathTraversalProbe;
use schema_confusion::SchemaConfusionProbe;
use ssrf::SSRFProbe;

/// The fixed dynamic-scan probe order: Auth, PathTraversal, SSRF,
/// CmdInjection, DoS, SchemaConfusion.
pub fn dynamic_probes() -> Vec<Box<dyn Probe + Send + Sync>> {
    vec![
        Box::new(AuthProbe),
        Box::new(PathTraversalProbe),
        Box::new(SSRFProbe),
        Box::new(CmdInjectionProbe),
        Box::new(DoSProbe),
        Box::new(SchemaConfusionProbe),
    ]
}

/// Severity associated with each probe, used by the runner when it
/// assembles a [`crate::report::Finding`].
pub fn severity_for_probe(probe_name: &str) -> crate::report::Severity {
    use crate::report::Severity;
    match probe_name {
        "PathTraversalProbe" | "SSRFProbe" | "CmdInjectionProbe" => Severity::High,
        "DoSProbe" | "AuthProbe" => Severity::Medium,
        "SchemaConfusionProbe" | "PromptInjectionProbe" => Severity::Low,
        _ => Severity::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_matches_spec() {
        let names: Vec<&str> = dynamic_probes().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "AuthProbe",
                "PathTraversalProbe",
                "SSRFProbe",
                "CmdInjectionProbe",
                "DoSProbe",
                "SchemaConfusionProbe",
            ]
        );
    }

    #[test]
    fn severity_map_matches_spec() {
        use crate::report::Severity;
        assert_eq!(severity_for_probe("PathTraversalProbe"), Severity::High);
        assert_eq!(severity_for_probe("SSRFProbe"), Severity::High);
        assert_eq!(severity_for_probe("CmdInjectionProbe"), Severity::High);
        assert_eq!(severity_for_probe("DoSProbe"), Severity::Medium);
        assert_eq!(severity_for_probe("AuthProbe"), Severity::Medium);
        assert_eq!(severity_for_probe("SchemaConfusionProbe"), Severity::Low);
        assert_eq!(severity_for_probe("PromptInjectionProbe"), Severity::Low);
    }
}
