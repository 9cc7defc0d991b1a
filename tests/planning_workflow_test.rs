//! 维修规划工作流集成测试（Mock LLM + 内存存储）

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use repair_planner::agent::AgentOracle;
use repair_planner::domain::{Part, Technician};
use repair_planner::inventory::InventoryGateway;
use repair_planner::llm::{LlmClient, Message, MockLlmClient};
use repair_planner::planning::PLANNER_INSTRUCTIONS;
use repair_planner::store::{seed, MemoryStore};
use repair_planner::work_orders::WorkOrderStore;
use repair_planner::{DiagnosedFault, PlanningError, RepairPlanningWorkflow};
use tokio_util::sync::CancellationToken;

fn build(llm: Arc<MockLlmClient>, store: Arc<MemoryStore>) -> RepairPlanningWorkflow {
    let oracle = Arc::new(AgentOracle::new(llm, PLANNER_INSTRUCTIONS));
    RepairPlanningWorkflow::new(
        oracle,
        InventoryGateway::new(store.clone()),
        WorkOrderStore::new(store),
    )
}

fn demo_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_inventory(
        seed::demo_technicians(),
        seed::demo_parts(),
    ))
}

fn drum_fault() -> DiagnosedFault {
    DiagnosedFault::new(
        "building_drum_vibration",
        "machine-002",
        "Building drum vibration at 14 mm/s RMS",
    )
}

const HALLUCINATED_PLAN: &str = r#"```json
{
  "WorkOrderNumber": "",
  "machineId": "",
  "title": "Replace building drum bearing",
  "description": "Drum bearing shows wear signature",
  "type": "Corrective",
  "priority": "HIGH",
  "assignedTo": "tech-999",
  "notes": "Check alignment afterwards",
  "estimatedDuration": "150",
  "partsUsed": [
    {"partId": "", "partNumber": "tbm-brg-6220", "quantity": "2"},
    {"partId": "ghost", "partNumber": "TBM-XYZ-000", "quantity": 1}
  ],
  "tasks": [
    {"sequence": 3, "title": "Verify", "description": "Run drum and measure vibration", "estimatedDurationMinutes": "30", "requiredSkills": ["vibration_analysis"]},
    {"sequence": 1, "title": "Lockout", "description": "Isolate energy", "estimatedDurationMinutes": 15, "requiredSkills": [], "safetyNotes": "LOTO"},
    {"sequence": 2, "title": "Replace bearing", "description": "Swap bearing 6220", "estimatedDurationMinutes": "105", "requiredSkills": "bearing_replacement, alignment"}
  ]
}
```"#;

#[tokio::test]
async fn test_plan_is_reconciled_against_inventory() {
    let store = demo_store();
    let llm = Arc::new(MockLlmClient::with_responses([HALLUCINATED_PLAN]));
    let workflow = build(llm.clone(), store.clone());

    let order = workflow
        .plan_repair(drum_fault(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!order.id.is_empty());
    assert!(order.work_order_number.starts_with("WO-"));
    assert_eq!(order.work_order_number.len(), "WO-".len() + 14);
    assert_eq!(order.machine_id, "machine-002");
    assert_eq!(order.status, "open");
    assert_eq!(order.assigned_to.as_deref(), Some("tech-002"));
    assert_eq!(order.estimated_duration, 150);

    assert_eq!(order.parts_used.len(), 1);
    assert_eq!(order.parts_used[0].part_number, "TBM-BRG-6220");
    assert_eq!(order.parts_used[0].part_id, "part-005");
    assert_eq!(order.parts_used[0].quantity, 2);

    let sequences: Vec<i64> = order.tasks.iter().map(|t| t.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert_eq!(order.tasks[1].estimated_duration_minutes, 105);
    assert_eq!(
        order.tasks[1].required_skills,
        vec!["bearing_replacement".to_string(), "alignment".to_string()]
    );
    assert_eq!(order.tasks[0].safety_notes.as_deref(), Some("LOTO"));

    let persisted = store.work_orders_in_partition("open").await;
    assert_eq!(persisted, vec![order]);

    let sent = llm.last_messages().unwrap();
    assert_eq!(sent[0].content, PLANNER_INSTRUCTIONS);
    assert!(sent[1].content.contains("id: tech-002, name: Maria Garcia"));
    assert!(!sent[1].content.contains("Priya Nair"));
    assert!(sent[1].content.contains("partNumber: TBM-BRG-6220"));
}

#[tokio::test]
async fn test_oracle_failure_persists_nothing() {
    let store = demo_store();
    let llm = Arc::new(MockLlmClient::failing("429 Too Many Requests"));
    let workflow = build(llm.clone(), store.clone());

    let err = workflow
        .plan_repair(drum_fault(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PlanningError::OracleInvocation(ref m) if m.contains("429")));
    assert_eq!(llm.call_count(), 1);
    assert_eq!(store.work_order_count().await, 0);
}

#[tokio::test]
async fn test_unparsable_response_persists_nothing() {
    let store = demo_store();
    let llm = Arc::new(MockLlmClient::with_responses([r#"{"title": "Fix", "tasks": ["#]));
    let workflow = build(llm, store.clone());

    let err = workflow
        .plan_repair(drum_fault(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PlanningError::ResponseParse { .. }));
    assert_eq!(store.work_order_count().await, 0);
}

#[tokio::test]
async fn test_cancelled_request_persists_nothing() {
    let store = demo_store();
    let llm = Arc::new(MockLlmClient::new());
    let workflow = build(llm.clone(), store.clone());

    let token = CancellationToken::new();
    token.cancel();
    let err = workflow.plan_repair(drum_fault(), &token).await.unwrap_err();

    assert!(matches!(err, PlanningError::Cancelled));
    assert_eq!(llm.call_count(), 0);
    assert_eq!(store.work_order_count().await, 0);
}

/// 调用后长时间不返回的模型
#[derive(Default)]
struct StalledLlm {
    calls: AtomicUsize,
}

#[async_trait]
impl LlmClient for StalledLlm {
    async fn complete(&self, _messages: &[Message]) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err("stalled model returned".to_string())
    }

    fn model(&self) -> &str {
        "stalled"
    }
}

#[tokio::test]
async fn test_cancel_while_invoking_persists_nothing() {
    let store = demo_store();
    let llm = Arc::new(StalledLlm::default());
    let oracle = Arc::new(AgentOracle::new(llm.clone(), PLANNER_INSTRUCTIONS));
    let workflow = RepairPlanningWorkflow::new(
        oracle,
        InventoryGateway::new(store.clone()),
        WorkOrderStore::new(store.clone()),
    );

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        workflow.plan_repair(drum_fault(), &token),
    )
    .await
    .expect("cancellation should abort the pending invocation")
    .unwrap_err();

    assert!(matches!(err, PlanningError::Cancelled));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.work_order_count().await, 0);
}

#[tokio::test]
async fn test_no_qualified_technicians_leaves_unassigned() {
    let store = Arc::new(MemoryStore::with_inventory(
        vec![Technician::new("tech-1", "Ana", "Quality", &["calibration"])],
        vec![Part::new("part-1", "TBM-BRG-6220", "Bearing", "bearings", 1)],
    ));
    let llm = Arc::new(MockLlmClient::with_responses([
        r#"{"assignedTo": "tech-1", "partsUsed": [{"partNumber": "TBM-BRG-6220", "quantity": 1}]}"#,
    ]));
    let workflow = build(llm, store.clone());

    let order = workflow
        .plan_repair(drum_fault(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(order.assigned_to.is_none());
    assert_eq!(order.parts_used.len(), 1);
    assert_eq!(store.work_order_count().await, 1);
}

#[tokio::test]
async fn test_technician_ranking_through_gateway() {
    let store = Arc::new(MemoryStore::with_inventory(
        vec![
            Technician::new("b", "B", "", &["x", "y"]),
            Technician::new("a", "A", "", &["x"]),
            Technician::new("c", "C", "", &["x", "y"]),
        ],
        vec![],
    ));
    let gateway = InventoryGateway::new(store);
    let ranked = gateway
        .find_available_technicians(&["x".to_string(), "y".to_string()], &CancellationToken::new())
        .await
        .unwrap();
    let names: Vec<&str> = ranked.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}
