//! End-to-end tests of the configure → resolve → aggregate → match flow
//! against a mock Densify instance.

use densify_client::{ApiQuery, Client, Error, RECOMMENDATION_TYPE_FALLBACK};
use mockito::{Matcher, Server, ServerGuard};

const FAR_FUTURE_MS: i64 = 4102444800000; // 2100-01-01

async fn server_with_auth() -> ServerGuard {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v2/authorize")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "userName": "user@xyz.com"
        })))
        .with_status(200)
        .with_body(format!(
            r#"{{"apiToken":"test-token","expires":{FAR_FUTURE_MS},"status":200,"message":""}}"#
        ))
        .create_async()
        .await;
    server
}

async fn connect(server: &ServerGuard) -> Client {
    Client::connect(&server.url(), "user@xyz.com", "password", 0)
        .await
        .expect("connect should succeed")
}

fn cloud_query() -> ApiQuery {
    ApiQuery {
        technology: "aws".to_string(),
        account_name: "General Services".to_string(),
        system_name: "Web-1".to_string(),
        fallback_instance: "m6i.large".to_string(),
        fallback_cpu_request: "123m".to_string(),
        fallback_cpu_limit: "321m".to_string(),
        fallback_mem_request: "234Mi".to_string(),
        fallback_mem_limit: "432Mi".to_string(),
        ..Default::default()
    }
}

async fn mock_analyses(server: &mut ServerGuard, path: &str, body: &str) {
    server
        .mock("GET", path)
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;
}

#[tokio::test]
async fn cloud_flow_resolves_aggregates_and_matches() {
    let mut server = server_with_auth().await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/cloud/aws",
        r#"[
            {"analysisId":"a1","analysisName":"aws scan 1","accountId":"111","accountName":"General Services A"},
            {"analysisId":"a2","analysisName":"aws scan 2","accountId":"222","accountName":"General Services B"},
            {"analysisId":"a3","analysisName":"aws scan 3","accountId":"333","accountName":"Mobile"}
        ]"#,
    )
    .await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/cloud/aws/a1/results",
        r#"[
            {"name":"web-1","entityId":"e1","analysisId":"a1","currentType":"m5.2xlarge","recommendedType":"m5.large","approvalType":"na"},
            {"name":"db-1","entityId":"e2","analysisId":"a1","currentType":"r5.xlarge","recommendedType":"r5.large","approvalType":"all"}
        ]"#,
    )
    .await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/cloud/aws/a2/results",
        r#"[
            {"name":"cache-1","entityId":"e3","analysisId":"a2","currentType":"m5.large","recommendedType":"t3.large","approvalType":""}
        ]"#,
    )
    .await;

    let mut client = connect(&server).await;
    assert!(!client.is_token_expired());

    client.configure_query(cloud_query()).unwrap();

    let analyses = client.get_account_or_cluster().await.unwrap();
    assert_eq!(analyses.len(), 2);
    assert_eq!(client.analysis_ids(), ["a1", "a2"]);

    // concatenation preserves per-analysis order, decoration is uniform
    let recos = client.get_recommendations().await.unwrap();
    assert_eq!(recos.len(), 3);
    assert_eq!(recos[0].name, "web-1");
    assert_eq!(recos[1].name, "db-1");
    assert_eq!(recos[2].name, "cache-1");
    for reco in &recos {
        assert_eq!(reco.analysis_type, "cloud");
        assert_eq!(reco.analysis_technology, "aws");
        assert_eq!(reco.account_name, "general services");
    }

    // approval "na" resolves to the current type at match time
    let matched = client.get_recommendation().await.unwrap();
    assert_eq!(matched.name, "web-1");
    assert_eq!(matched.approved_type, "m5.2xlarge");

    // identical external responses produce identical results
    let again = client.get_recommendation().await.unwrap();
    assert_eq!(matched, again);
}

#[tokio::test]
async fn resolution_failure_lists_available_accounts() {
    let mut server = server_with_auth().await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/cloud/aws",
        r#"[
            {"analysisId":"a1","accountName":"Mobile"},
            {"analysisId":"a2","accountName":"Mobile"},
            {"analysisId":"a3","accountName":"Payments"}
        ]"#,
    )
    .await;

    let mut client = connect(&server).await;
    client.configure_query(cloud_query()).unwrap();

    let err = client.get_account_or_cluster().await.unwrap_err();
    match err {
        Error::NoMatchingAccountOrCluster { name, available } => {
            assert_eq!(name, "general services");
            assert_eq!(available, "Mobile,\nPayments");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn resolution_failure_is_absorbed_with_skip_errors() {
    let mut server = server_with_auth().await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/cloud/aws",
        r#"[{"analysisId":"a1","accountName":"Mobile"}]"#,
    )
    .await;

    let mut client = connect(&server).await;
    let mut query = cloud_query();
    query.skip_errors = true;
    client.configure_query(query).unwrap();

    // nothing matches "general services", but the caller opted in
    let analyses = client.get_account_or_cluster().await.unwrap();
    assert!(analyses.is_empty());
    assert!(client.analysis_ids().is_empty());

    let fallback = client.get_recommendation().await.unwrap();
    assert_eq!(fallback.recommendation_type, RECOMMENDATION_TYPE_FALLBACK);
    assert_eq!(fallback.recommended_type, "m6i.large");
    assert_eq!(fallback.containers[0].fallback_mem_request, "234Mi");
}

#[tokio::test]
async fn any_failing_analysis_aborts_aggregation() {
    let mut server = server_with_auth().await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/cloud/aws",
        r#"[
            {"analysisId":"a1","accountName":"General Services A"},
            {"analysisId":"a2","accountName":"General Services B"}
        ]"#,
    )
    .await;
    mock_analyses(&mut server, "/api/v2/analysis/cloud/aws/a1/results", "[]").await;
    server
        .mock("GET", "/api/v2/analysis/cloud/aws/a2/results")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let mut client = connect(&server).await;
    client.configure_query(cloud_query()).unwrap();
    client.get_account_or_cluster().await.unwrap();

    let err = client.get_recommendations().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, .. }));

    // same upstream failure is absorbed when the caller opted in
    let mut query = cloud_query();
    query.skip_errors = true;
    client.configure_query(query).unwrap();
    client.get_account_or_cluster().await.unwrap();
    let fallback = client.get_recommendation().await.unwrap();
    assert_eq!(fallback.recommendation_type, RECOMMENDATION_TYPE_FALLBACK);
    assert_eq!(fallback.recommended_type, "m6i.large");
    assert_eq!(fallback.containers[0].fallback_cpu_request, "123m");
}

#[tokio::test]
async fn aggregation_requires_resolution_first() {
    let server = server_with_auth().await;
    let mut client = connect(&server).await;

    assert!(matches!(
        client.get_recommendations().await,
        Err(Error::NoConfiguredQuery)
    ));

    client.configure_query(cloud_query()).unwrap();
    assert!(matches!(
        client.get_recommendations().await,
        Err(Error::NoResolvedAnalyses)
    ));
}

#[tokio::test]
async fn kubernetes_flow_merges_pod_containers() {
    let mut server = server_with_auth().await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/containers/kubernetes",
        r#"[
            {"analysisId":"k1","analysisName":"Prod-Cluster-01"},
            {"analysisId":"k2","analysisName":"staging-cluster"}
        ]"#,
    )
    .await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/containers/kubernetes/k1/results",
        r#"[
            {"container":"app","namespace":"ns1","controllerType":"Deployment","podService":"web","recommendedCpuRequest":250,"recommSeenCount":12},
            {"container":"sidecar","namespace":"ns1","controllerType":"Deployment","podService":"web","recommendedCpuRequest":50},
            {"container":"istio-proxy","namespace":"ns1","controllerType":"Deployment","podService":"web","recommendedCpuRequest":10},
            {"container":"app","namespace":"ns2","controllerType":"Deployment","podService":"web"}
        ]"#,
    )
    .await;

    let mut client = connect(&server).await;
    let query = ApiQuery {
        technology: "kubernetes".to_string(),
        k8s_cluster: "prod-cluster".to_string(),
        k8s_namespace: "NS1".to_string(),
        k8s_controller_type: "deployment".to_string(),
        k8s_pod_name: "web".to_string(),
        ..Default::default()
    };
    client.configure_query(query).unwrap();

    // substring containment: "prod-cluster" matches "Prod-Cluster-01"
    let analyses = client.get_account_or_cluster().await.unwrap();
    assert_eq!(analyses.len(), 1);
    assert_eq!(analyses[0].analysis_id, "k1");

    let matched = client.get_recommendation().await.unwrap();
    assert_eq!(matched.analysis_type, "containers");
    assert_eq!(matched.containers.len(), 3);
    assert!(matched.container.is_empty());
    assert_eq!(matched.containers[0].container, "app");
    assert_eq!(matched.containers[0].days_reco_unchanged, 12);
    assert_eq!(matched.containers[1].container, "sidecar");
    assert_eq!(matched.containers[2].container, "istio-proxy");
}

#[tokio::test]
async fn guardrails_load_populates_governance() {
    let mut server = server_with_auth().await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/cloud/aws",
        r#"[{"analysisId":"a1","accountName":"General Services"}]"#,
    )
    .await;
    mock_analyses(
        &mut server,
        "/api/v2/analysis/cloud/aws/a1/results",
        r#"[{"name":"web-1","entityId":"e1","analysisId":"a1","recommendedType":"m6i.large"}]"#,
    )
    .await;
    server
        .mock("GET", "/api/v2/analysis/cloud/aws/a1/results/e1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("scope".into(), "instanceGovernance".into()),
            Matcher::UrlEncoded("spendTolerance".into(), "1.2".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{
                "current": {"instanceType":"m5.2xlarge","blendedScore":40,"compatability":"OK"},
                "optimal": {"instanceType":"m6i.large","blendedScore":95,"compatability":"OK"},
                "targets": [
                    {"instance_type":"m6i.large","blended_score":95,"compatability":"OK","percentOptimalCost":100.0},
                    {"instance_type":"m5.large","blended_score":88,"compatability":"OK","percentOptimalCost":104.0},
                    {"instance_type":"t3.nano","blended_score":10,"compatability":"Insufficient Resources"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let mut client = connect(&server).await;
    client.configure_query(cloud_query()).unwrap();
    client.get_account_or_cluster().await.unwrap();
    let mut matched = client.get_recommendation().await.unwrap();

    client.load_guardrails(&mut matched, 1.2).await.unwrap();
    assert_eq!(matched.instance_governance.optimal.instance_type, "m6i.large");

    let ok = matched.guardrails_ok().unwrap();
    assert_eq!(ok.total_len(), 2);
    assert_eq!(ok.max_score(), Some(95));
    assert_eq!(ok.sorted_scores(), vec![88, 95]);
}

#[tokio::test]
async fn expired_token_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v2/authorize")
        .with_status(200)
        .with_body(r#"{"apiToken":"tok","expires":1000,"status":200,"message":""}"#)
        .create_async()
        .await;

    let client = Client::connect(&server.url(), "user@xyz.com", "password", 0)
        .await
        .unwrap();
    assert!(client.is_token_expired());
}

#[tokio::test]
async fn failed_auth_surfaces_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v2/authorize")
        .with_status(401)
        .with_body("unauthorized")
        .create_async()
        .await;

    let err = Client::connect(&server.url(), "user@xyz.com", "wrong", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AuthFailed { status: 401 }));
}
