//! Repository behavior shared by the SQLite and PostgreSQL stores.

mod common;

use common::*;
use scheme_metadata::MetadataError;
use serde_json::json;
use sqlx::types::Json;

#[tokio::test]
async fn test_agent_crud() {
    run_metadata_test_both(|store| async move {
        let row = agent_row(10, "A1", "a1");
        store.create_agent(&row).await.unwrap();

        let fetched = store.get_agent(10).await.unwrap().expect("agent exists");
        assert_eq!(fetched.name, "A1");
        assert_eq!(fetched.load, "10_a1");
        assert_eq!(fetched.side, "red");
        assert_eq!(fetched.url, "agent/10_a1.zip");
        assert_eq!(fetched.param_schema.0, row.param_schema.0);
        assert_eq!(fetched.supported_env_templates.0, vec![1001, 1002]);
        assert_eq!(fetched.created_at, row.created_at);

        assert_eq!(
            store.get_agent_by_name("A1").await.unwrap().unwrap().id,
            10
        );
        assert_eq!(
            store.get_agent_by_load("10_a1").await.unwrap().unwrap().id,
            10
        );
        assert!(store.get_agent_by_name("missing").await.unwrap().is_none());

        store.create_agent(&agent_row(11, "A2", "a2")).await.unwrap();
        let all = store.list_agents().await.unwrap();
        assert_eq!(all.iter().map(|a| a.id).collect::<Vec<_>>(), vec![10, 11]);

        store.delete_agent(10).await.unwrap();
        assert!(store.get_agent(10).await.unwrap().is_none());
        assert!(matches!(
            store.delete_agent(10).await,
            Err(MetadataError::NotFound(_))
        ));
    })
    .await;
}

#[tokio::test]
async fn test_agent_duplicate_name_leaves_existing_row() {
    run_metadata_test_both(|store| async move {
        store.create_agent(&agent_row(1, "A1", "a1")).await.unwrap();

        let mut dup = agent_row(2, "A1", "other");
        dup.description = "replacement".to_string();
        let err = store.create_agent(&dup).await.unwrap_err();
        assert!(matches!(err, MetadataError::AlreadyExists(_)), "{err:?}");

        let existing = store.get_agent_by_name("A1").await.unwrap().unwrap();
        assert_eq!(existing.id, 1);
        assert_eq!(existing.description, "A1 description");
        assert!(store.get_agent(2).await.unwrap().is_none());
    })
    .await;
}

#[tokio::test]
async fn test_env_template_crud() {
    run_metadata_test_both(|store| async move {
        store
            .create_env_template(&env_template_row(1001, "grid"))
            .await
            .unwrap();
        assert!(matches!(
            store
                .create_env_template(&env_template_row(1002, "grid"))
                .await,
            Err(MetadataError::AlreadyExists(_))
        ));

        let template = store.get_env_template_by_name("grid").await.unwrap().unwrap();
        assert_eq!(template.id, 1001);
        assert_eq!(template.param_schema.0, json!({"map": {"type": "string"}}));
        assert_eq!(store.list_env_templates().await.unwrap().len(), 1);

        store.delete_env_template(1001).await.unwrap();
        assert!(store.get_env_template(1001).await.unwrap().is_none());
        assert!(matches!(
            store.delete_env_template(1001).await,
            Err(MetadataError::NotFound(_))
        ));

        for (id, name) in [(1003, "dunes"), (1004, "forest")] {
            store
                .create_env_template(&env_template_row(id, name))
                .await
                .unwrap();
        }
        assert_eq!(store.delete_all_env_templates().await.unwrap(), 2);
        assert!(store.list_env_templates().await.unwrap().is_empty());
        assert_eq!(store.delete_all_env_templates().await.unwrap(), 0);
    })
    .await;
}

#[tokio::test]
async fn test_env_instance_update_and_delete_all() {
    run_metadata_test_both(|store| async move {
        store
            .create_env_instance(&env_instance_row(1, "i1", 100))
            .await
            .unwrap();
        store
            .create_env_instance(&env_instance_row(2, "i2", 100))
            .await
            .unwrap();
        store
            .create_env_instance(&env_instance_row(3, "i3", 200))
            .await
            .unwrap();

        let by_template = store.list_env_instances_by_template(100).await.unwrap();
        assert_eq!(
            by_template.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let mut updated = env_instance_row(1, "i1-renamed", 200);
        updated.params = Json(json!({"map": "forest"}));
        store.update_env_instance(&updated).await.unwrap();
        let fetched = store.get_env_instance(1).await.unwrap().unwrap();
        assert_eq!(fetched.name, "i1-renamed");
        assert_eq!(fetched.template_id, 200);
        assert_eq!(fetched.params.0, json!({"map": "forest"}));

        // Taking another instance's name conflicts.
        let clash = env_instance_row(1, "i2", 200);
        assert!(matches!(
            store.update_env_instance(&clash).await,
            Err(MetadataError::AlreadyExists(_))
        ));

        // Keeping its own name is fine.
        store
            .update_env_instance(&env_instance_row(2, "i2", 300))
            .await
            .unwrap();

        assert!(matches!(
            store
                .update_env_instance(&env_instance_row(99, "ghost", 100))
                .await,
            Err(MetadataError::NotFound(_))
        ));

        assert_eq!(store.delete_all_env_instances().await.unwrap(), 3);
        assert!(store.list_env_instances().await.unwrap().is_empty());
        assert_eq!(store.delete_all_env_instances().await.unwrap(), 0);
    })
    .await;
}

#[tokio::test]
async fn test_scheme_preserves_agent_scheme_order() {
    run_metadata_test_both(|store| async move {
        let subs = vec![
            json!({"agent_id": 3, "weight": 0.5}),
            json!({"agent_id": 1}),
            json!({"agent_id": 2, "params": {"depth": 4}}),
        ];
        store
            .create_scheme(&scheme_row(5, "blue-team", subs.clone()))
            .await
            .unwrap();

        let fetched = store.get_scheme(5).await.unwrap().unwrap();
        assert_eq!(fetched.agent_schemes.0, subs);
        assert_eq!(fetched.side, "blue");

        assert!(matches!(
            store.create_scheme(&scheme_row(6, "blue-team", vec![])).await,
            Err(MetadataError::AlreadyExists(_))
        ));

        store.delete_scheme(5).await.unwrap();
        assert!(store.get_scheme_by_name("blue-team").await.unwrap().is_none());
    })
    .await;
}

#[tokio::test]
async fn test_deduction_plan_update() {
    run_metadata_test_both(|store| async move {
        store
            .create_deduction_plan(&deduction_plan_row(1, "plan-a"))
            .await
            .unwrap();
        store
            .create_deduction_plan(&deduction_plan_row(2, "plan-b"))
            .await
            .unwrap();

        let mut plan = store.get_deduction_plan(1).await.unwrap().unwrap();
        assert_eq!(plan.status, "inactive");
        assert!(plan.start_time.is_none());

        let start = now();
        plan.status = "running".to_string();
        plan.description = Some("first run".to_string());
        plan.start_time = Some(start);
        store.update_deduction_plan(&plan).await.unwrap();

        let fetched = store.get_deduction_plan_by_name("plan-a").await.unwrap().unwrap();
        assert_eq!(fetched.status, "running");
        assert_eq!(fetched.description.as_deref(), Some("first run"));
        assert_eq!(fetched.start_time, Some(start));

        plan.name = "plan-b".to_string();
        assert!(matches!(
            store.update_deduction_plan(&plan).await,
            Err(MetadataError::AlreadyExists(_))
        ));

        store.delete_deduction_plan(2).await.unwrap();
        assert_eq!(store.list_deduction_plans().await.unwrap().len(), 1);
    })
    .await;
}

#[tokio::test]
async fn test_task_logs_by_task() {
    run_metadata_test_both(|store| async move {
        store.create_task_log(&task_log_row(1, 77, "start")).await.unwrap();
        store.create_task_log(&task_log_row(2, 88, "other")).await.unwrap();
        store.create_task_log(&task_log_row(3, 77, "stop")).await.unwrap();

        let logs = store.list_task_logs_by_task(77).await.unwrap();
        assert_eq!(
            logs.iter().map(|l| l.content.as_str()).collect::<Vec<_>>(),
            vec!["start", "stop"]
        );
        assert!(store.list_task_logs_by_task(1).await.unwrap().is_empty());
        assert_eq!(store.list_task_logs().await.unwrap().len(), 3);

        store.delete_task_log(2).await.unwrap();
        assert!(store.get_task_log(2).await.unwrap().is_none());
        assert!(matches!(
            store.delete_task_log(2).await,
            Err(MetadataError::NotFound(_))
        ));
    })
    .await;
}

#[tokio::test]
async fn test_task_status_lifecycle() {
    run_metadata_test_both(|store| async move {
        store
            .create_task_status(&task_status_row(500, "unknown"))
            .await
            .unwrap();
        assert!(matches!(
            store
                .create_task_status(&task_status_row(500, "normal"))
                .await,
            Err(MetadataError::AlreadyExists(_))
        ));

        let mut status = task_status_row(500, "terminal");
        status.suffix = 4;
        store.update_task_status(&status).await.unwrap();
        let fetched = store.get_task_status(500).await.unwrap().unwrap();
        assert_eq!(fetched.status, "terminal");
        assert_eq!(fetched.suffix, 4);

        assert!(matches!(
            store
                .update_task_status(&task_status_row(501, "normal"))
                .await,
            Err(MetadataError::NotFound(_))
        ));

        assert_eq!(store.list_task_statuses().await.unwrap().len(), 1);
        store.delete_task_status(500).await.unwrap();
        assert!(store.get_task_status(500).await.unwrap().is_none());
    })
    .await;
}
