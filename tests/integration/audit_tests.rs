//! Integration tests for audit records written by the engine

use infra_guardrails::{
    AuditDecision, AuditEntry, AuditLog, Environment, Outcome, PolicyEngine, Tool,
};
use tempfile::TempDir;

fn engine(tool: Tool) -> PolicyEngine {
    PolicyEngine::with_defaults(tool, &Environment::new("/work", false)).unwrap()
}

fn read_entries(path: &std::path::Path) -> Vec<AuditEntry> {
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(|line| AuditEntry::from_json(line).unwrap())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[test]
fn test_each_decision_writes_one_record() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("terraform.log");
    let engine = engine(Tool::Terraform);

    let cases = [
        ("terraform apply", AuditDecision::Blocked),
        ("terraform plan", AuditDecision::PendingApproval),
        ("cmd=apply; terraform $cmd", AuditDecision::PendingApprovalSuspicious),
    ];

    for (i, (command, expected)) in cases.iter().enumerate() {
        let mut audit = AuditLog::new(Some(&path));
        let decision = engine.evaluate(command, "/work/infra", &mut audit);
        assert_eq!(decision.audit_decision(), Some(*expected));

        let entries = read_entries(&path);
        assert_eq!(entries.len(), i + 1);
        let last = entries.last().unwrap();
        assert_eq!(last.command(), *command);
        assert_eq!(last.audit_decision(), *expected);
        assert_eq!(last.working_dir(), "/work/infra");
    }
}

#[test]
fn test_allow_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("helm.log");
    let mut audit = AuditLog::new(Some(&path));

    let decision = engine(Tool::Helm).evaluate("kubectl get pods", "/work", &mut audit);
    assert!(decision.is_allow());
    assert!(!path.exists());
}

#[test]
fn test_decision_record_reasons() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("helm.log");
    let engine = engine(Tool::Helm);
    let mut audit = AuditLog::new(Some(&path));

    engine.evaluate("helm rollback myrelease 1", "/c", &mut audit);
    engine.evaluate("x=install; helm $x", "/c", &mut audit);
    engine.evaluate("helm lint .", "/c", &mut audit);

    let reasons: Vec<String> = read_entries(&path)
        .into_iter()
        .map(|entry| match entry {
            AuditEntry::Decision(d) => d.reason,
            other => panic!("unexpected entry {:?}", other),
        })
        .collect();
    assert_eq!(
        reasons,
        vec![
            "Blocked: helm rollback",
            "Contains blocked keywords: install",
            "Awaiting user approval",
        ]
    );
}

#[test]
fn test_audit_failure_does_not_change_decision() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("file");
    std::fs::write(&blocker, "not a directory").unwrap();
    let mut audit = AuditLog::new(Some(&blocker.join("audit").join("terraform.log")));

    let decision = engine(Tool::Terraform).evaluate("terraform destroy", "/w", &mut audit);
    assert!(decision.is_deny());
    assert!(decision.hard_block());

    let decision = engine(Tool::Terraform).evaluate("terraform plan", "/w", &mut audit);
    assert!(decision.is_ask());
}

#[test]
fn test_completion_records() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("terraform.log");
    let engine = engine(Tool::Terraform);
    let mut audit = AuditLog::new(Some(&path));

    let ran = |success: bool| Outcome {
        success,
        exit_code: serde_json::json!(if success { 0 } else { 1 }),
        user_approved: true,
    };
    let denied = Outcome {
        success: false,
        exit_code: serde_json::json!("unknown"),
        user_approved: false,
    };

    assert_eq!(
        engine.record_completion("terraform plan", "/w", &ran(true), &mut audit),
        Some(AuditDecision::CompletedSuccess)
    );
    assert_eq!(
        engine.record_completion("terraform validate", "/w", &ran(false), &mut audit),
        Some(AuditDecision::CompletedFailure)
    );
    assert_eq!(
        engine.record_completion("terraform init", "/w", &denied, &mut audit),
        Some(AuditDecision::DeniedByUser)
    );
    assert_eq!(engine.record_completion("ls", "/w", &denied, &mut audit), None);

    let entries = read_entries(&path);
    assert_eq!(entries.len(), 3);
    match &entries[2] {
        AuditEntry::Completion(c) => {
            assert_eq!(c.command, "terraform init");
            assert_eq!(c.exit_code, serde_json::json!("unknown"));
            assert!(!c.user_approved);
            assert!(!c.success);
        }
        other => panic!("expected completion entry, got {:?}", other),
    }
}

#[test]
fn test_rotated_file_name() {
    let temp = TempDir::new().unwrap();
    let mut audit = AuditLog::for_tool(temp.path(), "helm", true);
    engine(Tool::Helm).evaluate("helm install a b", "/w", &mut audit);

    let name = audit.path().unwrap().file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("helm-"));
    assert!(name.ends_with(".log"));
    assert_eq!(name.len(), "helm-YYYY-MM-DD.log".len());
    assert_eq!(read_entries(audit.path().unwrap()).len(), 1);
}

#[test]
fn test_concurrent_appends_keep_whole_lines() {
    const WRITERS: usize = 8;
    const RECORDS: usize = 50;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("audit").join("terraform.log");

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut audit = AuditLog::new(Some(&path));
                let padding = "x".repeat(512);
                for record in 0..RECORDS {
                    let command = format!("terraform plan -var=w{}r{}={}", writer, record, padding);
                    let entry = AuditEntry::decision(
                        &command,
                        AuditDecision::PendingApproval,
                        "/work",
                        "Awaiting user approval",
                    );
                    audit.append(&entry).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = read_entries(&path);
    assert_eq!(entries.len(), WRITERS * RECORDS);
    for writer in 0..WRITERS {
        for record in 0..RECORDS {
            let marker = format!("-var=w{}r{}=", writer, record);
            assert_eq!(
                entries.iter().filter(|e| e.command().contains(&marker)).count(),
                1,
                "{}",
                marker
            );
        }
    }
}
