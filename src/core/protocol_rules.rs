// src/core/protocol_rules.rs

//! This module acts as the routing brain of the normalizer.
//! It contains a static, read-only table describing, for every protocol the
//! scanning service executes, which rewrite algorithm its executor requires
//! and which port to assume when the input carries none.
//! Making this data-driven keeps the transform engine free of per-protocol
//! branching and makes the identity fallback an explicit absence in the
//! table rather than an implicit code path.

use crate::core::models::{ProtocolType, TransformationKind};

/// Describes how targets declared for one protocol must be rewritten
/// before they reach that protocol's executor.
pub struct TransformRule {
    /// The protocol a template declares for its requests.
    pub protocol: ProtocolType,
    /// The rewrite algorithm the executor's targets must go through.
    pub kind: TransformationKind,
    /// Port appended when the input carries none. Only meaningful for
    /// kinds that emit a `host:port` pair.
    pub default_port: Option<u16>,
}

/// The centralized, static table of transformation rules.
///
/// Protocols absent from this table take their input verbatim: the engine
/// falls back to identity instead of failing, so a new protocol added
/// upstream degrades gracefully until a rule is written for it.
static RULES: &[TransformRule] = &[
    TransformRule {
        protocol: ProtocolType::Dns,
        kind: TransformationKind::HostOnly,
        default_port: None,
    },
    TransformRule {
        protocol: ProtocolType::Whois,
        kind: TransformationKind::HostOnly,
        default_port: None,
    },
    TransformRule {
        protocol: ProtocolType::File,
        kind: TransformationKind::Filepath,
        default_port: None,
    },
    TransformRule {
        protocol: ProtocolType::OfflineHttp,
        kind: TransformationKind::Filepath,
        default_port: None,
    },
    TransformRule {
        protocol: ProtocolType::Http,
        kind: TransformationKind::Url,
        default_port: None,
    },
    TransformRule {
        protocol: ProtocolType::Headless,
        kind: TransformationKind::Url,
        default_port: None,
    },
    TransformRule {
        protocol: ProtocolType::Network,
        kind: TransformationKind::HostWithOptionalPort,
        default_port: None,
    },
    TransformRule {
        protocol: ProtocolType::Ssl,
        kind: TransformationKind::HostWithPort,
        default_port: Some(443),
    },
    TransformRule {
        protocol: ProtocolType::Websocket,
        kind: TransformationKind::Websocket,
        default_port: None,
    },
];

/// Retrieves the transformation rule for a protocol from the static table.
///
/// # Arguments
///
/// * `protocol` - The protocol declared by the template or target.
///
/// # Returns
///
/// An `Option` containing a reference to the `TransformRule` if the
/// protocol is mapped, or `None` when the identity fallback applies.
pub fn rule_for(protocol: ProtocolType) -> Option<&'static TransformRule> {
    RULES.iter().find(|rule| rule.protocol == protocol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_scannable_protocol_is_mapped() {
        let expectations = [
            (ProtocolType::Dns, TransformationKind::HostOnly),
            (ProtocolType::Whois, TransformationKind::HostOnly),
            (ProtocolType::File, TransformationKind::Filepath),
            (ProtocolType::OfflineHttp, TransformationKind::Filepath),
            (ProtocolType::Http, TransformationKind::Url),
            (ProtocolType::Headless, TransformationKind::Url),
            (ProtocolType::Network, TransformationKind::HostWithOptionalPort),
            (ProtocolType::Ssl, TransformationKind::HostWithPort),
            (ProtocolType::Websocket, TransformationKind::Websocket),
        ];
        for (protocol, kind) in expectations {
            let rule = rule_for(protocol).expect("protocol should be mapped");
            assert_eq!(rule.kind, kind, "wrong kind for {protocol}");
        }
    }

    #[test]
    fn only_ssl_carries_a_default_port() {
        for protocol in ProtocolType::iter() {
            match rule_for(protocol) {
                Some(rule) if protocol == ProtocolType::Ssl => {
                    assert_eq!(rule.default_port, Some(443));
                }
                Some(rule) => assert_eq!(rule.default_port, None, "{protocol}"),
                None => {}
            }
        }
    }

    #[test]
    fn self_contained_protocols_are_unmapped() {
        assert!(rule_for(ProtocolType::Workflow).is_none());
        assert!(rule_for(ProtocolType::Code).is_none());
    }
}
