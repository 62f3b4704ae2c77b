//! Row builders for metadata tests.

use scheme_metadata::models::*;
use serde_json::{Value, json};
use sqlx::types::Json;
use time::OffsetDateTime;

/// Current time truncated to microseconds, the precision PostgreSQL keeps.
pub fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .expect("microsecond truncation stays in range")
}

#[allow(dead_code)]
pub fn agent_row(id: i64, name: &str, load: &str) -> AgentRow {
    let now = now();
    AgentRow {
        id,
        name: name.to_string(),
        load: format!("{id}_{load}"),
        description: format!("{name} description"),
        side: "red".to_string(),
        param_schema: Json(json!({"speed": {"type": "number"}})),
        supported_env_templates: Json(vec![1001, 1002]),
        url: format!("agent/{id}_{load}.zip"),
        created_at: now,
        updated_at: now,
    }
}

#[allow(dead_code)]
pub fn env_template_row(id: i64, name: &str) -> EnvTemplateRow {
    let now = now();
    EnvTemplateRow {
        id,
        name: name.to_string(),
        param_schema: Json(json!({"map": {"type": "string"}})),
        created_at: now,
        updated_at: now,
    }
}

#[allow(dead_code)]
pub fn env_instance_row(id: i64, name: &str, template_id: i64) -> EnvInstanceRow {
    let now = now();
    EnvInstanceRow {
        id,
        name: name.to_string(),
        template_id,
        params: Json(json!({"map": "desert"})),
        created_at: now,
        updated_at: now,
    }
}

#[allow(dead_code)]
pub fn scheme_row(id: i64, name: &str, agent_schemes: Vec<Value>) -> SchemeRow {
    let now = now();
    SchemeRow {
        id,
        name: name.to_string(),
        description: String::new(),
        side: "blue".to_string(),
        agent_schemes: Json(agent_schemes),
        created_at: now,
        updated_at: now,
    }
}

#[allow(dead_code)]
pub fn deduction_plan_row(id: i64, name: &str) -> DeductionPlanRow {
    let now = now();
    DeductionPlanRow {
        id,
        name: name.to_string(),
        description: None,
        status: "inactive".to_string(),
        plan_config: Json(json!({"rounds": 3})),
        start_time: None,
        created_at: now,
        updated_at: now,
    }
}

#[allow(dead_code)]
pub fn task_log_row(id: i64, task_id: i64, content: &str) -> TaskLogRow {
    TaskLogRow {
        id,
        task_id,
        suffix: 1,
        content: content.to_string(),
        kind: "log".to_string(),
        level: "info".to_string(),
        created_at: now(),
    }
}

#[allow(dead_code)]
pub fn task_status_row(task_id: i64, status: &str) -> TaskStatusRow {
    let now = now();
    TaskStatusRow {
        task_id,
        suffix: 0,
        status: status.to_string(),
        created_at: now,
        updated_at: now,
    }
}
