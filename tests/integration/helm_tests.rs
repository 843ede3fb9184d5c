//! Integration tests for the Helm policy

use infra_guardrails::{Decision, Environment, Permission, PolicyEngine, Tool};

const CWD: &str = "/work/charts/myapp";

fn engine() -> PolicyEngine {
    PolicyEngine::with_defaults(Tool::Helm, &Environment::new("/work", true)).unwrap()
}

fn check(command: &str) -> Decision {
    engine().classify(command, CWD)
}

fn assert_denied(command: &str) {
    let decision = check(command);
    assert!(decision.is_deny(), "expected deny for {:?}, got {:?}", command, decision);
    assert!(decision.hard_block());
    assert!(decision.reason().contains("BLOCKED"));
}

fn assert_routine(command: &str) {
    let decision = check(command);
    assert!(
        matches!(decision, Decision::Ask { .. }),
        "expected routine ask for {:?}, got {:?}",
        command,
        decision
    );
    assert!(decision.reason().contains("requires approval"));
    assert!(!decision.reason().contains("WARNING"));
}

fn assert_not_denied(command: &str) {
    let decision = check(command);
    assert!(!decision.hard_block(), "unexpected block for {:?}", command);
    assert_eq!(decision.permission(), Permission::Ask, "{:?}", command);
}

// ============================================================================
// Blocked commands
// ============================================================================

#[test]
fn test_bare_blocked() {
    assert_denied("helm install myrelease mychart");
    assert_denied("helm upgrade myrelease mychart");
    assert_denied("helm uninstall myrelease");
    assert_denied("helm delete myrelease");
    assert_denied("helm rollback myrelease 1");
    assert_denied("helm test myrelease");
}

#[test]
fn test_global_flags_still_blocked() {
    assert_denied("helm --namespace prod install myrelease mychart");
    assert_denied("helm --kube-context staging --namespace prod install myrelease mychart");
    assert_denied("helm --namespace=prod install myrelease mychart");
    assert_denied("helm --debug upgrade myrelease mychart");
    assert_denied("helm --kubeconfig /tmp/kubeconfig install myrelease mychart");
    assert_denied("helm -n prod --kube-context a --kubeconfig /k --debug rollback r 3");
}

#[test]
fn test_line_continuation_blocked() {
    assert_denied("helm \\\n  install x .");
    assert_denied("helm --namespace prod \\\n  upgrade myrelease ./chart");
}

#[test]
fn test_flags_after_subcommand() {
    assert_denied("helm install --namespace prod myrelease mychart");
    assert_denied("helm upgrade --install myrelease mychart --wait");
}

#[test]
fn test_piped_and_chained_blocked() {
    assert_denied("echo values.yaml | xargs helm install myrelease");
    assert_denied("helm lint . && helm upgrade myrelease .");
}

#[test]
fn test_deny_reason_points_to_gitops() {
    let decision = check("helm --namespace prod install myrelease mychart");
    assert_eq!(decision.rule_id(), Some("helm-install"));
    let reason = decision.reason();
    assert!(reason.starts_with("BLOCKED: helm install is not allowed."));
    assert!(reason.contains("GitOps workflow"));
    assert!(reason.contains("helm template <chart>"));
    assert!(reason.contains("Working directory: /work/charts/myapp"));
}

// ============================================================================
// Prompted commands
// ============================================================================

#[test]
fn test_safe_commands_prompt() {
    for command in [
        "helm template myrelease .",
        "helm lint .",
        "helm show values mychart",
        "helm show chart mychart",
        "helm dependency update .",
        "helm package .",
        "helm repo list",
        "helm repo add bitnami https://charts.bitnami.com",
        "helm search repo mychart",
        "helm version",
        "helm env",
        "helm template myrelease . -f values-prod.yaml",
    ] {
        assert_routine(command);
    }
}

// ============================================================================
// Non-matching commands
// ============================================================================

#[test]
fn test_non_helm_allowed() {
    for command in [
        "echo hello",
        "kubectl apply -f manifest.yaml",
        "terraform plan",
        "ls -la",
        "git status",
        "helmsman apply",
        "helmsman install",
    ] {
        let (permission, reason, hard_block) = check(command).into_parts();
        assert_eq!(permission, Permission::Allow, "{:?}", command);
        assert!(reason.is_empty());
        assert!(!hard_block);
    }
}

// ============================================================================
// Suspicious keyword detection
// ============================================================================

#[test]
fn test_suspicious_warned() {
    for command in [
        r#"subcmd="install"; helm $subcmd"#,
        r#"chart="upgrade"; helm $chart"#,
        "action=rollback; helm $action myrelease",
    ] {
        let decision = check(command);
        assert!(decision.is_suspicious(), "{:?}", command);
        assert!(!decision.hard_block());
        assert!(decision.reason().contains("WARNING"));
        assert!(decision.reason().contains("blocked operation"));
    }
}

#[test]
fn test_template_not_suspicious() {
    assert_routine("helm template myrelease .");
}

// ============================================================================
// False positive resistance
// ============================================================================

#[test]
fn test_set_value_with_keyword() {
    assert_not_denied("helm template myrelease . --set phase=install");
    assert_not_denied("helm template myrelease . --set action=upgrade");
    assert!(check("helm template myrelease . --set phase=install").is_suspicious());
}

#[test]
fn test_keyword_as_equals_value_not_blocked() {
    assert_not_denied("helm --set phase=install template myrelease .");
    assert_not_denied("helm template x --set install=true");
}

#[test]
fn test_pipeline_keyword_not_blocked() {
    assert_not_denied("helm template myrelease . | grep install");
    assert_not_denied("helm history myrelease; echo rollback");
}

// ============================================================================
// Case insensitivity
// ============================================================================

#[test]
fn test_case_insensitive() {
    assert_denied("HELM INSTALL myrelease");
    assert_denied("Helm Upgrade myrelease mychart");
    assert_routine("HELM TEMPLATE myrelease .");
    assert!(check("OP=InStAlL; HeLm $OP").is_suspicious());
    // The space-separated gap reaches into the substitution
    assert_denied("HeLm $(echo InStAlL)");
}
