//! Desired vs observed comparison.

use log::{debug, warn};

use crate::error::ConfigError;
use crate::model::{
    Action, ChangeDirective, DesiredConfig, ObservedConfig, ObservedFields, ObservedValue,
    RESERVED_FIELDS,
};
use crate::resource::{CompositeField, RenderPhase, ResourceKind};

/// Decide the single action that brings the device to `desired`.
///
/// Directives follow listing order. Fields reported by the device without a
/// desired counterpart, and desired fields the device never reports, produce
/// nothing.
pub fn diff(
    kind: &ResourceKind,
    desired: &DesiredConfig,
    observed: &ObservedConfig,
) -> Result<Action, ConfigError> {
    let state = desired.state()?;
    let action = match observed {
        ObservedConfig::Absent if state.is_absent() => Action::NoOp,
        ObservedConfig::Absent => Action::Create,
        ObservedConfig::Present(_) if state.is_absent() => Action::Delete,
        ObservedConfig::Present(fields) => {
            let directives = directives(kind, desired, fields);
            if directives.is_empty() {
                Action::NoOp
            } else {
                Action::Modify(directives)
            }
        }
    };
    Ok(action)
}

fn directives(
    kind: &ResourceKind,
    desired: &DesiredConfig,
    observed: &ObservedFields,
) -> Vec<ChangeDirective> {
    let mut directives = Vec::new();
    let mut pairs_seen: Vec<(&str, &str)> = Vec::new();

    for (field, value) in observed.iter() {
        if RESERVED_FIELDS.contains(&field) || !kind.is_known(field) {
            continue;
        }

        if let Some(pair) = kind.boolean_pair(field) {
            // only the first reported member of a pair reflects device state
            if pairs_seen.contains(&pair) {
                continue;
            }
            pairs_seen.push(pair);
            match wanted_flag(desired, pair) {
                Some(wanted) if wanted != field => {
                    debug!("diff: {} -> {}", field, wanted);
                    directives.push(ChangeDirective::flag(wanted));
                }
                _ => {}
            }
            continue;
        }

        let Some(want) = desired.get(field) else {
            continue;
        };

        match value {
            ObservedValue::Composite(raw) => {
                let fallback;
                let composite = match kind.composite(field) {
                    Some(composite) => composite,
                    None => {
                        fallback = CompositeField::new(field);
                        &fallback
                    }
                };
                let have = composite.normalize_observed(raw);
                let wanted = composite.normalize_desired(want);
                if have != wanted {
                    debug!("diff: {}: {:?} -> {:?}", field, have, wanted);
                    directives.push(ChangeDirective::new(
                        field,
                        composite.render_argument(want, RenderPhase::Modify),
                    ));
                }
            }
            ObservedValue::Scalar(have) => {
                let wanted = want.render();
                if !kind.rule(field).equals(have, &wanted) {
                    debug!("diff: {}: {:?} -> {:?}", field, have, wanted);
                    directives.push(ChangeDirective::new(field, wanted));
                }
            }
            ObservedValue::Flag => {}
        }
    }

    for (field, _) in desired.managed_fields() {
        if observed.get(field).is_none() && kind.boolean_pair(field).is_none() {
            warn!("diff: {} field '{}' is not reported by the device; not compared", kind.name, field);
        }
    }
    directives
}

/// The member of `pair` the caller asks for, if the caller mentions either.
fn wanted_flag<'p>(desired: &DesiredConfig, (on, off): (&'p str, &'p str)) -> Option<&'p str> {
    if desired.is_truthy(on) {
        Some(on)
    } else if desired.is_truthy(off) {
        Some(off)
    } else if desired.contains(on) {
        Some(off)
    } else if desired.contains(off) {
        Some(on)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FieldExtractor, LineFilter};
    use crate::model::FieldValue;
    use crate::resource::Dialect;
    use crate::resource::kinds::{client_ssl, persistence_hash, tcp, virtual_server};

    fn observe(kind: &ResourceKind, name: &str, listing: &[&str]) -> ObservedConfig {
        let dialect = Dialect::tmsh();
        let filter = LineFilter::new(kind, &dialect, name);
        FieldExtractor::new(filter).extract(listing, name).unwrap()
    }

    fn t1() -> DesiredConfig {
        DesiredConfig::new().with("name", "t1").with("partition", "Common")
    }

    #[test]
    fn test_absent_creates() {
        let kind = tcp::kind();
        let desired = t1().with("state", "present").with("idle-timeout", 300);
        let observed = observe(&kind, "t1", &["not found"]);
        assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::Create);
    }

    #[test]
    fn test_modify_changed_scalar() {
        let kind = tcp::kind();
        let desired = t1().with("idle-timeout", 300);
        let observed = observe(&kind, "t1", &["idle-timeout 200"]);
        assert_eq!(
            diff(&kind, &desired, &observed).unwrap(),
            Action::Modify(vec![ChangeDirective::new("idle-timeout", "300")])
        );
    }

    #[test]
    fn test_equal_scalar_is_noop() {
        let kind = tcp::kind();
        let desired = DesiredConfig::new().with("idle-timeout", 300);
        let observed = observe(&kind, "t1", &["idle-timeout 300"]);
        assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::NoOp);
    }

    #[test]
    fn test_absent_and_not_found_is_noop() {
        let kind = tcp::kind();
        let desired = t1().with("state", "absent").with("idle-timeout", 300);
        let observed = observe(&kind, "t1", &["not found"]);
        assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::NoOp);
    }

    #[test]
    fn test_absent_overrides_field_diffs() {
        let kind = tcp::kind();
        let observed = observe(&kind, "t1", &["idle-timeout 200"]);
        for timeout in [200, 300] {
            let desired = t1().with("state", "absent").with("idle-timeout", timeout);
            assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::Delete);
        }
    }

    #[test]
    fn test_boolean_pair_flips_once() {
        let kind = virtual_server::kind();
        let desired = DesiredConfig::new().with("vlans-enabled", true);
        let observed = observe(&kind, "vs1", &["vlans-disabled"]);
        assert_eq!(
            diff(&kind, &desired, &observed).unwrap(),
            Action::Modify(vec![ChangeDirective::flag("vlans-enabled")])
        );

        // a repeated pair line is not compared again
        let observed = observe(&kind, "vs1", &["vlans-disabled", "vlans-enabled"]);
        assert_eq!(diff(&kind, &desired, &observed).unwrap().directives().len(), 1);
    }

    #[test]
    fn test_boolean_pair_matching_is_noop() {
        let kind = virtual_server::kind();
        let desired = DesiredConfig::new()
            .with("vlans-enabled", false)
            .with("vlans-disabled", true);
        let observed = observe(&kind, "vs1", &["vlans-disabled"]);
        assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::NoOp);
    }

    #[test]
    fn test_boolean_pair_falsy_only() {
        let kind = virtual_server::kind();
        let desired = DesiredConfig::new().with("vlans-disabled", false);
        let observed = observe(&kind, "vs1", &["vlans-disabled"]);
        assert_eq!(
            diff(&kind, &desired, &observed).unwrap(),
            Action::Modify(vec![ChangeDirective::flag("vlans-enabled")])
        );
    }

    #[test]
    fn test_admin_state_from_state_field() {
        let kind = virtual_server::kind();
        let observed = observe(&kind, "vs1", &["ltm virtual vs1 {", "    enabled", "}"]);

        let desired = DesiredConfig::new().with("name", "vs1").with("state", "disabled");
        assert_eq!(
            diff(&kind, &desired, &observed).unwrap(),
            Action::Modify(vec![ChangeDirective::flag("disabled")])
        );

        // plain `present` says nothing about admin state
        let desired = DesiredConfig::new().with("name", "vs1").with("state", "present");
        assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::NoOp);
    }

    #[test]
    fn test_directives_follow_listing_order() {
        let kind = tcp::kind();
        let desired = t1().with("nagle", "disabled").with("idle-timeout", 300);
        let observed = observe(
            &kind,
            "t1",
            &["ltm profile tcp t1 {", "    idle-timeout 200", "    nagle enabled", "}"],
        );
        let action = diff(&kind, &desired, &observed).unwrap();
        let order: Vec<&str> = action.directives().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(order, vec!["idle-timeout", "nagle"]);
    }

    #[test]
    fn test_unreported_and_unrequested_fields_ignored() {
        let kind = tcp::kind();
        let desired = t1().with("not-listed", 5);
        let observed = observe(&kind, "t1", &["idle-timeout 200", "nagle enabled"]);
        assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::NoOp);
    }

    #[test]
    fn test_unknown_observed_field_never_compared() {
        let kind = persistence_hash::kind();
        let mut fields = ObservedFields::new();
        fields.record("cookie-name", ObservedValue::Scalar("x".into()));
        fields.record("timeout", ObservedValue::Scalar("180".into()));
        let desired = DesiredConfig::new().with("name", "h1").with("timeout", 180);
        assert_eq!(
            diff(&kind, &desired, &ObservedConfig::Present(fields)).unwrap(),
            Action::NoOp
        );
    }

    #[test]
    fn test_profiles_reorder_is_noop_and_change_replaces() {
        let kind = virtual_server::kind();
        let observed = observe(
            &kind,
            "vs1",
            &[
                "ltm virtual vs1 {",
                "    profiles {",
                "        /Common/http { context all }",
                "        /Common/tcp { context all }",
                "    }",
                "}",
            ],
        );
        let same = DesiredConfig::new().with(
            "profiles",
            vec!["/Common/tcp { context all }", "/Common/http { context all }"],
        );
        assert_eq!(diff(&kind, &same, &observed).unwrap(), Action::NoOp);

        let changed = DesiredConfig::new().with("profiles", vec!["/Common/tcp { context all }"]);
        assert_eq!(
            diff(&kind, &changed, &observed).unwrap(),
            Action::Modify(vec![ChangeDirective::new(
                "profiles",
                "replace-all-with { /Common/tcp { context all } }"
            )])
        );
    }

    #[test]
    fn test_destination_ignores_route_domain() {
        let kind = virtual_server::kind();
        let observed = observe(&kind, "vs1", &["destination 10.1.1.10%0:443"]);
        let desired = DesiredConfig::new().with("destination", "10.1.1.10:443");
        assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::NoOp);

        let desired = DesiredConfig::new().with("destination", "10.1.1.10:8443");
        assert_eq!(
            diff(&kind, &desired, &observed).unwrap(),
            Action::Modify(vec![ChangeDirective::new("destination", "10.1.1.10:8443")])
        );
    }

    #[test]
    fn test_cert_key_chain() {
        let kind = client_ssl::kind();
        let observed = observe(
            &kind,
            "cs1",
            &[
                "ltm profile client-ssl cs1 {",
                "    cert-key-chain {",
                "        default {",
                "            cert /Common/default.crt,",
                "            key /Common/default.key",
                "        }",
                "    }",
                "}",
            ],
        );
        let same = DesiredConfig::new().with(
            "cert-key-chain",
            "{ default { cert /Common/default.crt key /Common/default.key } }",
        );
        assert_eq!(diff(&kind, &same, &observed).unwrap(), Action::NoOp);

        let new = DesiredConfig::new().with(
            "cert-key-chain",
            "{ default { cert /Common/app.crt key /Common/app.key } }",
        );
        assert_eq!(diff(&kind, &new, &observed).unwrap().directives().len(), 1);
    }

    #[test]
    fn test_composites_round_trip() {
        let vs = virtual_server::kind();
        let ssl = client_ssl::kind();
        let cases: Vec<(&ResourceKind, &str, FieldValue, Vec<&str>, FieldValue)> = vec![
            (
                &vs,
                "profiles",
                FieldValue::from(vec!["/Common/http { context all }", "/Common/tcp { context all }"]),
                vec![
                    "    profiles {",
                    "        /Common/tcp {",
                    "            context all",
                    "        }",
                    "        /Common/http {",
                    "            context all",
                    "        }",
                    "    }",
                ],
                FieldValue::from(vec!["/Common/http { context clientside }"]),
            ),
            (
                &vs,
                "source-address-translation",
                FieldValue::from("{ type automap pool none }"),
                vec![
                    "    source-address-translation {",
                    "        pool none",
                    "        type automap",
                    "    }",
                ],
                FieldValue::from("{ type snat pool /Common/snat_pool }"),
            ),
            (
                &ssl,
                "cert-key-chain",
                FieldValue::from("{ default { key /Common/a.key cert /Common/a.crt chain none } }"),
                vec![
                    "    cert-key-chain {",
                    "        default {",
                    "            cert /Common/a.crt",
                    "            chain none",
                    "            key /Common/a.key",
                    "        }",
                    "    }",
                ],
                FieldValue::from("{ default { cert /Common/a.key key /Common/a.crt chain none } }"),
            ),
            (
                &vs,
                "persist",
                FieldValue::from(vec!["/Common/cookie { default yes }"]),
                vec![
                    "    persist {",
                    "        /Common/cookie {",
                    "            default yes",
                    "        }",
                    "    }",
                ],
                FieldValue::from(vec!["/Common/source_addr { default yes }"]),
            ),
            (
                &vs,
                "rules",
                FieldValue::from(vec!["/Common/redirect", "/Common/audit"]),
                vec!["    rules {", "        /Common/audit", "        /Common/redirect", "    }"],
                FieldValue::from(vec!["/Common/redirect"]),
            ),
            (
                &vs,
                "vlans",
                FieldValue::from(vec!["/Common/external"]),
                vec!["    vlans {", "        /Common/external", "    }"],
                FieldValue::from(vec!["/Common/internal"]),
            ),
        ];

        for (kind, field, value, device, other) in cases {
            let header = format!("{} obj1 {{", kind.object_path);
            let sent = format!("    {} {}", field, value.render());
            let mut listed = vec![header.as_str()];
            listed.extend(device);
            listed.push("}");
            let desired = DesiredConfig::new().with("name", "obj1").with(field, value);

            let echoed = observe(kind, "obj1", &[header.as_str(), sent.as_str(), "}"]);
            assert_eq!(diff(kind, &desired, &echoed).unwrap(), Action::NoOp, "{field} as sent");

            let observed = observe(kind, "obj1", &listed);
            assert_eq!(diff(kind, &desired, &observed).unwrap(), Action::NoOp, "{field} as listed");

            let changed = DesiredConfig::new().with("name", "obj1").with(field, other);
            assert_eq!(
                diff(kind, &changed, &observed).unwrap().directives().len(),
                1,
                "{field} changed"
            );
        }
    }

    #[test]
    fn test_idempotent_after_converge() {
        let kind = tcp::kind();
        let desired = t1()
            .with("idle-timeout", 300)
            .with("nagle", "enabled")
            .with("zero-window-timeout", 20000);
        let observed = observe(
            &kind,
            "t1",
            &[
                "ltm profile tcp t1 {",
                "    idle-timeout 300",
                "    nagle enabled",
                "---(less 62%)---    zero-window-timeout 20000",
                "}",
            ],
        );
        assert_eq!(diff(&kind, &desired, &observed).unwrap(), Action::NoOp);
    }

    #[test]
    fn test_invalid_state_is_config_error() {
        let kind = tcp::kind();
        let desired = t1().with("state", "gone");
        let observed = observe(&kind, "t1", &["not found"]);
        assert!(matches!(
            diff(&kind, &desired, &observed),
            Err(ConfigError::UnknownState { .. })
        ));
    }
}
