mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use e2e_catalog::api::create_router;
use e2e_catalog::api::types::*;
use e2e_catalog::dashboard::DashboardReport;
use e2e_catalog::models::{StepCategory, StepDefinition, StepKeyword};
use e2e_catalog::provider::*;
use e2e_catalog::store::{DataStore, LoadStatus, ScenarioRow, StoreStatus};
use serde_json::{json, Value};

use common::BASE_PATH;

fn setup_with(provider: Arc<StaticProvider>) -> (TestServer, DataStore) {
    let store = DataStore::new(provider);
    let server = TestServer::new(create_router(store.clone())).expect("Failed to create test server");
    (server, store)
}

async fn setup_loaded() -> TestServer {
    let (server, store) = setup_with(Arc::new(common::provider()));
    store.load_all(BASE_PATH).await.expect("Failed to load");
    server
}

mod health {
    use super::*;

    #[tokio::test]
    async fn returns_ok() {
        let (server, _) = setup_with(Arc::new(StaticProvider::empty()));
        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "status": "ok" }));
    }
}

mod not_loaded {
    use super::*;

    #[tokio::test]
    async fn catalog_routes_answer_service_unavailable() {
        let (server, _) = setup_with(Arc::new(common::provider()));

        for path in [
            "/api/v1/scenarios",
            "/api/v1/scenarios/s1",
            "/api/v1/features/f1",
            "/api/v1/features/f1/source",
            "/api/v1/organizations",
            "/api/v1/organizations/1",
            "/api/v1/owners/ana",
            "/api/v1/teams/core",
            "/api/v1/dashboard",
        ] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(response.text(), "Data not loaded", "{path}");
        }
    }

    #[tokio::test]
    async fn status_reports_empty() {
        let (server, _) = setup_with(Arc::new(common::provider()));
        let status = server.get("/api/v1/status").await.json::<StoreStatus>();

        assert_eq!(status.status, LoadStatus::Empty);
        assert!(!status.loaded);
        assert!(status.base_path.is_none());
    }
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn lists_table_rows() {
        let server = setup_loaded().await;
        let rows = server.get("/api/v1/scenarios").await.json::<Vec<ScenarioRow>>();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].scenario_id, "s1");
        assert_eq!(rows[0].tags, vec!["@smoke", "@auth"]);
        assert_eq!(rows[2].owner, "bo");
    }

    #[tokio::test]
    async fn returns_scenario_detail() {
        let server = setup_loaded().await;
        let detail = server.get("/api/v1/scenarios/s2").await.json::<ScenarioDetail>();

        assert_eq!(detail.feature_name, "Login");
        assert_eq!(detail.organization_slug, "1-acme-corp");
        assert_eq!(detail.flags, vec!["flag_c"]);
        assert_eq!(detail.mock_dates, vec!["2024-01-01", "2024-02-01"]);
        assert_eq!(detail.command_max_len, 35);
        assert!(detail.is_broken);
    }

    #[tokio::test]
    async fn returns_not_found_for_unknown_id() {
        let server = setup_loaded().await;
        let response = server.get("/api/v1/scenarios/missing").await;

        response.assert_status_not_found();
        assert_eq!(response.text(), "Scenario not found");
    }
}

mod features {
    use super::*;

    #[tokio::test]
    async fn returns_feature_with_scenarios() {
        let server = setup_loaded().await;
        let detail = server.get("/api/v1/features/f1").await.json::<FeatureDetail>();

        assert_eq!(detail.feature.name, "Login");
        assert_eq!(detail.feature.scenario_count, 2);
        assert_eq!(detail.scenarios.len(), 2);
        assert_eq!(detail.flags, vec!["flag_a", "flag_b", "flag_c"]);
        assert_eq!(detail.command_max_len, Some(35));
    }

    #[tokio::test]
    async fn serializes_missing_command_width_as_null() {
        let server = setup_loaded().await;
        let body = server.get("/api/v1/features/f3").await.json::<Value>();

        assert_eq!(body["command_max_len"], Value::Null);
        assert_eq!(body["scenario_count"], json!(0));
    }

    #[tokio::test]
    async fn returns_not_found_for_unknown_id() {
        let server = setup_loaded().await;
        let response = server.get("/api/v1/features/missing").await;

        response.assert_status_not_found();
        assert_eq!(response.text(), "Feature not found");
    }
}

mod feature_source {
    use super::*;

    const LOGIN_FEATURE: &str = "@auth
Feature: Login

  @smoke
  Scenario: Scenario s1
    Given current organization is \"Acme Corp\"

  @broken
  Scenario: Scenario s2
    Given current organization is \"Acme Corp\"
";

    async fn setup_with_source() -> TestServer {
        let provider = Arc::new(common::provider());
        provider.set_source("features/login.feature", LOGIN_FEATURE);
        let (server, store) = setup_with(provider);
        store.load_all(BASE_PATH).await.expect("Failed to load");
        server
    }

    #[tokio::test]
    async fn returns_the_whole_file() {
        let server = setup_with_source().await;
        let source = server.get("/api/v1/features/f1/source").await.json::<FeatureSource>();

        assert_eq!(source.file_path, "features/login.feature");
        assert!(source.scenario_id.is_none());
        assert!(source.contents.starts_with("1: @auth\n2: Feature: Login\n"));
        assert!(source.contents.ends_with("10:     Given current organization is \"Acme Corp\"\n"));
    }

    #[tokio::test]
    async fn returns_one_scenario_block() {
        let server = setup_with_source().await;
        let source = server
            .get("/api/v1/features/f1/source")
            .add_query_param("scenario", "s2")
            .await
            .json::<FeatureSource>();

        assert_eq!(source.scenario_id.as_deref(), Some("s2"));
        assert_eq!(
            source.contents,
            "9:   Scenario: Scenario s2\n10:     Given current organization is \"Acme Corp\"\n"
        );
    }

    #[tokio::test]
    async fn returns_not_found_for_a_scenario_of_another_feature() {
        let server = setup_with_source().await;
        let response = server
            .get("/api/v1/features/f1/source")
            .add_query_param("scenario", "s3")
            .await;

        response.assert_status_not_found();
        assert_eq!(response.text(), "Scenario not found");
    }

    #[tokio::test]
    async fn answers_bad_gateway_when_the_file_is_missing() {
        let server = setup_with_source().await;
        let response = server.get("/api/v1/features/f2/source").await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(response.text(), "Invalid file path");
    }
}

mod steps {
    use super::*;

    fn step(line: usize, pattern: &str, category: StepCategory, problem: Option<&str>) -> StepDefinition {
        StepDefinition {
            id: format!("steps/common.ts:{line}"),
            keyword: StepKeyword::Given,
            pattern: pattern.to_string(),
            file_path: "steps/common.ts".to_string(),
            line_number: line,
            category,
            is_problematic: problem.is_some(),
            problem_reason: problem.map(str::to_string),
        }
    }

    fn provider_with_steps() -> Arc<StaticProvider> {
        let provider = Arc::new(common::provider());
        provider.set_steps(Ok(vec![
            step(1, "user is on a {string} screen", StepCategory::Other, None),
            step(4, "wait {int} seconds", StepCategory::Waits, Some("Uses explicit wait with seconds")),
            step(7, "create an invoice", StepCategory::DataSetup, None),
        ]));
        provider
    }

    #[tokio::test]
    async fn answers_bad_request_without_a_base_path() {
        let (server, _) = setup_with(provider_with_steps());
        let response = server.get("/api/v1/steps").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "base path not found");
    }

    #[tokio::test]
    async fn lists_step_definitions() {
        let (server, store) = setup_with(provider_with_steps());
        store.load_all(BASE_PATH).await.expect("Failed to load");

        let steps = server.get("/api/v1/steps").await.json::<Vec<StepDefinition>>();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].id, "steps/common.ts:4");
    }

    #[tokio::test]
    async fn serves_steps_after_a_failed_load() {
        let provider = provider_with_steps();
        provider.set_features(Err(ProviderError::new("features unreadable")));
        let (server, store) = setup_with(provider);
        let _ = store.load_all(BASE_PATH).await;

        server.get("/api/v1/steps").await.assert_status_ok();
    }

    #[tokio::test]
    async fn filters_by_category_and_problem() {
        let (server, store) = setup_with(provider_with_steps());
        store.load_all(BASE_PATH).await.expect("Failed to load");

        let steps = server
            .get("/api/v1/steps")
            .add_query_param("category", "Data Setup")
            .await
            .json::<Vec<StepDefinition>>();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].pattern, "create an invoice");

        let steps = server
            .get("/api/v1/steps")
            .add_query_param("problematic", true)
            .await
            .json::<Vec<StepDefinition>>();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].category, StepCategory::Waits);
    }

    #[tokio::test]
    async fn answers_bad_gateway_on_provider_errors() {
        let provider = provider_with_steps();
        provider.set_steps(Err(ProviderError::new("step_definitions folder not found at: /repos/e2e/features/step-definitions")));
        let (server, store) = setup_with(provider);
        store.load_all(BASE_PATH).await.expect("Failed to load");

        let response = server.get("/api/v1/steps").await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        assert!(response.text().starts_with("step_definitions folder not found"));
    }
}

mod organizations {
    use super::*;

    #[tokio::test]
    async fn lists_organizations_teams_and_owners() {
        let server = setup_loaded().await;
        let body = server.get("/api/v1/organizations").await.json::<OrganizationsResponse>();

        assert_eq!(body.organizations.len(), 3);
        assert_eq!(body.organizations[0].slug, "1-acme-corp");
        assert_eq!(body.organizations[2].scenario_count, 0);
        assert_eq!(body.teams, vec!["core", "billing"]);
        assert_eq!(body.owners[0].teams, vec!["billing", "core"]);
    }

    #[tokio::test]
    async fn returns_organization_detail() {
        let server = setup_loaded().await;
        let detail = server.get("/api/v1/organizations/1").await.json::<OrganizationDetail>();

        assert_eq!(detail.organization.owner, "ana");
        assert_eq!(detail.organization.team, "core");
        assert_eq!(detail.scenarios.len(), 2);
    }

    #[tokio::test]
    async fn lists_clone_candidates() {
        let server = setup_loaded().await;
        let candidates = server
            .get("/api/v1/organizations/clone-candidates")
            .await
            .json::<Vec<CloneCandidate>>();

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[1], CloneCandidate { id: "2".to_string(), name: "Beta LLC".to_string() });
    }

    #[tokio::test]
    async fn partitions_templates_and_clones() {
        let server = setup_loaded().await;
        let body = server
            .post("/api/v1/organizations/partition")
            .json(&json!({
                "groups": [{
                    "template_name": "Acme Corp",
                    "template_id": "1",
                    "clones": [{ "org_id": "3", "org_name": "Empty Org", "clone_id": "ACME-1" }]
                }]
            }))
            .await
            .json::<PartitionResponse>();

        let templates: Vec<_> = body.templates.iter().map(|o| o.id.as_str()).collect();
        let clones: Vec<_> = body.clones.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(templates, vec!["1", "2"]);
        assert_eq!(clones, vec!["3"]);
    }

    #[tokio::test]
    async fn returns_not_found_for_unknown_id() {
        let server = setup_loaded().await;
        let response = server.get("/api/v1/organizations/99").await;

        response.assert_status_not_found();
        assert_eq!(response.text(), "Organization not found");
    }
}

mod owners_and_teams {
    use super::*;

    #[tokio::test]
    async fn returns_owner_detail() {
        let server = setup_loaded().await;
        let detail = server.get("/api/v1/owners/ana").await.json::<OwnerDetail>();

        assert_eq!(detail.owner.avatar, "https://avatars.example.com/ana.png");
        assert_eq!(detail.organizations.len(), 2);
        assert_eq!(detail.features.len(), 1);
        assert_eq!(detail.scenarios.len(), 2);
    }

    #[tokio::test]
    async fn returns_team_detail() {
        let server = setup_loaded().await;
        let detail = server.get("/api/v1/teams/billing").await.json::<TeamDetail>();

        let members: Vec<_> = detail.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(members, vec!["ana", "bo"]);
        assert_eq!(detail.organizations.len(), 1);
        assert_eq!(detail.scenarios.len(), 1);
    }

    #[tokio::test]
    async fn returns_not_found_for_unknown_names() {
        let server = setup_loaded().await;

        let response = server.get("/api/v1/owners/nobody").await;
        response.assert_status_not_found();
        assert_eq!(response.text(), "Owner not found");

        let response = server.get("/api/v1/teams/nobody").await;
        response.assert_status_not_found();
        assert_eq!(response.text(), "Team not found");
    }
}

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn returns_the_report() {
        let server = setup_loaded().await;
        let report = server.get("/api/v1/dashboard").await.json::<DashboardReport>();

        assert_eq!(report.stats.scenario_count, 4);
        assert_eq!(report.stats.broken_count, 3);
        assert_eq!(report.broken_scenarios.len(), 3);
        assert_eq!(report.orgs_without_tests[0].name, "Empty Org");
        assert_eq!(report.team_breakdown[0].team, "core");
        assert_eq!(report.owner_breakdown[0].owner, "ana");
    }
}

mod reload {
    use super::*;

    #[tokio::test]
    async fn reloads_from_the_last_base_path() {
        let provider = Arc::new(common::provider());
        let (server, store) = setup_with(provider.clone());
        store.load_all(BASE_PATH).await.expect("Failed to load");

        let status = server.post("/api/v1/reload").await.json::<StoreStatus>();

        assert!(status.loaded);
        assert_eq!(status.generation, 2);
        assert_eq!(provider.validate_calls(), 2);
    }

    #[tokio::test]
    async fn answers_bad_request_without_a_base_path() {
        let (server, _) = setup_with(Arc::new(common::provider()));
        let response = server.post("/api/v1/reload").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "base path not found");
    }

    #[tokio::test]
    async fn answers_not_found_for_an_invalid_repo() {
        let provider = Arc::new(common::provider());
        let (server, store) = setup_with(provider.clone());
        store.load_all(BASE_PATH).await.expect("Failed to load");

        provider.set_valid(false);
        let response = server.post("/api/v1/reload").await;

        response.assert_status_not_found();
        assert!(response.text().contains(BASE_PATH));
    }

    #[tokio::test]
    async fn answers_bad_gateway_on_provider_errors_and_stops_serving() {
        let provider = Arc::new(common::provider());
        let (server, store) = setup_with(provider.clone());
        store.load_all(BASE_PATH).await.expect("Failed to load");

        provider.set_features(Err(ProviderError::new("features unreadable")));
        let response = server.post("/api/v1/reload").await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(response.text(), "features unreadable");

        server
            .get("/api/v1/scenarios")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let status = server.get("/api/v1/status").await.json::<StoreStatus>();
        assert_eq!(status.status, LoadStatus::Failed);
        assert_eq!(status.last_error.as_deref(), Some("features unreadable"));
    }
}
