//! Typed endpoint wrappers for the admin API.
//!
//! # Design
//! `AdminClient` is a thin layer over `Transport`: each method builds a path
//! and `RequestOptions`, then names the type the response decodes into. All
//! retry, timeout and error handling lives in the transport. Endpoints that
//! return nothing useful ignore whatever body the server sends.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;

use crate::config::TransportConfig;
use crate::error::ApiError;
use crate::fetch::{Fetch, ReqwestFetcher};
use crate::http::{HttpMethod, RequestOptions};
use crate::timer::{Timer, TokioTimer};
use crate::transport::Transport;
use crate::types::{
    ClusterInfo, ClusterMetrics, ConnectionInput, ConnectionProfile, ConnectionStatus,
    CreateIndexRequest, CreateK8sClusterRequest, CreateRoleRequest, CreateUserRequest,
    K8sClusterDetail, K8sClusterSummary, MessageResponse, QueryRequest, QueryResponse, Record,
    RecordListResponse, RecordWriteRequest, Role, ScaleK8sClusterRequest, SecondaryIndex,
    TerminalCommand, TestConnectionRequest, TestConnectionResult, UdfModule,
    UpdateK8sClusterRequest, UploadUdfRequest, User,
};

/// Health checks give up sooner than regular calls.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Debug, Clone)]
pub struct AdminClient<F = ReqwestFetcher, T = TokioTimer> {
    transport: Transport<F, T>,
}

impl AdminClient {
    pub fn new(config: &TransportConfig) -> Self {
        Self::with_transport(Transport::new(config))
    }
}

impl<F: Fetch, T: Timer> AdminClient<F, T> {
    pub fn with_transport(transport: Transport<F, T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport<F, T> {
        &self.transport
    }

    async fn send<B, R>(&self, method: HttpMethod, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let options = RequestOptions::method(method).with_json(body)?;
        self.transport.request(path, &options).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.transport
            .request::<IgnoredAny>(path, &RequestOptions::method(HttpMethod::Delete))
            .await
            .map(|_| ())
    }

    // --- connections ---

    pub async fn list_connections(&self) -> Result<Vec<ConnectionProfile>, ApiError> {
        self.transport.get("/api/connections").await
    }

    pub async fn connection_health(&self, id: &str) -> Result<ConnectionStatus, ApiError> {
        let options = RequestOptions::new().with_timeout(HEALTH_CHECK_TIMEOUT);
        self.transport
            .request(&format!("/api/connections/{id}/health"), &options)
            .await
    }

    pub async fn create_connection(
        &self,
        input: &ConnectionInput,
    ) -> Result<ConnectionProfile, ApiError> {
        self.send(HttpMethod::Post, "/api/connections", input).await
    }

    pub async fn update_connection(
        &self,
        id: &str,
        input: &ConnectionInput,
    ) -> Result<ConnectionProfile, ApiError> {
        self.send(HttpMethod::Put, &format!("/api/connections/{id}"), input)
            .await
    }

    pub async fn delete_connection(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/connections/{id}")).await
    }

    /// Check that a cluster is reachable without saving a profile.
    pub async fn test_connection(
        &self,
        request: &TestConnectionRequest,
    ) -> Result<TestConnectionResult, ApiError> {
        self.send(HttpMethod::Post, "/api/connections/test", request)
            .await
    }

    // --- cluster ---

    pub async fn get_cluster(&self, conn_id: &str) -> Result<ClusterInfo, ApiError> {
        self.transport.get(&format!("/api/clusters/{conn_id}")).await
    }

    /// The backend accepts an open-ended namespace configuration object.
    pub async fn configure_namespace<B: Serialize + ?Sized>(
        &self,
        conn_id: &str,
        config: &B,
    ) -> Result<MessageResponse, ApiError> {
        self.send(
            HttpMethod::Post,
            &format!("/api/clusters/{conn_id}/namespaces"),
            config,
        )
        .await
    }

    // --- records ---

    pub async fn list_records(
        &self,
        conn_id: &str,
        namespace: &str,
        set: &str,
    ) -> Result<RecordListResponse, ApiError> {
        self.list_records_page(conn_id, namespace, set, DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
            .await
    }

    pub async fn list_records_page(
        &self,
        conn_id: &str,
        namespace: &str,
        set: &str,
        page: u32,
        page_size: u32,
    ) -> Result<RecordListResponse, ApiError> {
        let query = query_string(&[
            ("ns", namespace),
            ("set", set),
            ("page", &page.to_string()),
            ("pageSize", &page_size.to_string()),
        ]);
        self.transport
            .get(&format!("/api/records/{conn_id}?{query}"))
            .await
    }

    pub async fn put_record(
        &self,
        conn_id: &str,
        request: &RecordWriteRequest,
    ) -> Result<Record, ApiError> {
        self.send(HttpMethod::Post, &format!("/api/records/{conn_id}"), request)
            .await
    }

    pub async fn delete_record(
        &self,
        conn_id: &str,
        namespace: &str,
        set: &str,
        pk: &str,
    ) -> Result<(), ApiError> {
        let query = query_string(&[("ns", namespace), ("set", set), ("pk", pk)]);
        self.delete(&format!("/api/records/{conn_id}?{query}"))
            .await
    }

    // --- query ---

    pub async fn execute_query(
        &self,
        conn_id: &str,
        query: &QueryRequest,
    ) -> Result<QueryResponse, ApiError> {
        self.send(HttpMethod::Post, &format!("/api/query/{conn_id}"), query)
            .await
    }

    // --- indexes ---

    pub async fn list_indexes(&self, conn_id: &str) -> Result<Vec<SecondaryIndex>, ApiError> {
        self.transport.get(&format!("/api/indexes/{conn_id}")).await
    }

    pub async fn create_index(
        &self,
        conn_id: &str,
        request: &CreateIndexRequest,
    ) -> Result<SecondaryIndex, ApiError> {
        self.send(HttpMethod::Post, &format!("/api/indexes/{conn_id}"), request)
            .await
    }

    pub async fn delete_index(
        &self,
        conn_id: &str,
        name: &str,
        namespace: &str,
    ) -> Result<(), ApiError> {
        let query = query_string(&[("name", name), ("ns", namespace)]);
        self.delete(&format!("/api/indexes/{conn_id}?{query}"))
            .await
    }

    // --- users and roles ---

    pub async fn list_users(&self, conn_id: &str) -> Result<Vec<User>, ApiError> {
        self.transport
            .get(&format!("/api/admin/{conn_id}/users"))
            .await
    }

    pub async fn create_user(
        &self,
        conn_id: &str,
        request: &CreateUserRequest,
    ) -> Result<User, ApiError> {
        self.send(
            HttpMethod::Post,
            &format!("/api/admin/{conn_id}/users"),
            request,
        )
        .await
    }

    pub async fn change_password(
        &self,
        conn_id: &str,
        username: &str,
        password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        self.send(
            HttpMethod::Patch,
            &format!("/api/admin/{conn_id}/users"),
            &body,
        )
        .await
    }

    pub async fn delete_user(&self, conn_id: &str, username: &str) -> Result<(), ApiError> {
        let query = query_string(&[("username", username)]);
        self.delete(&format!("/api/admin/{conn_id}/users?{query}"))
            .await
    }

    pub async fn list_roles(&self, conn_id: &str) -> Result<Vec<Role>, ApiError> {
        self.transport
            .get(&format!("/api/admin/{conn_id}/roles"))
            .await
    }

    pub async fn create_role(
        &self,
        conn_id: &str,
        request: &CreateRoleRequest,
    ) -> Result<Role, ApiError> {
        self.send(
            HttpMethod::Post,
            &format!("/api/admin/{conn_id}/roles"),
            request,
        )
        .await
    }

    pub async fn delete_role(&self, conn_id: &str, name: &str) -> Result<(), ApiError> {
        let query = query_string(&[("name", name)]);
        self.delete(&format!("/api/admin/{conn_id}/roles?{query}"))
            .await
    }

    // --- UDFs ---

    pub async fn list_udfs(&self, conn_id: &str) -> Result<Vec<UdfModule>, ApiError> {
        self.transport.get(&format!("/api/udfs/{conn_id}")).await
    }

    pub async fn upload_udf(
        &self,
        conn_id: &str,
        request: &UploadUdfRequest,
    ) -> Result<UdfModule, ApiError> {
        self.send(HttpMethod::Post, &format!("/api/udfs/{conn_id}"), request)
            .await
    }

    pub async fn delete_udf(&self, conn_id: &str, filename: &str) -> Result<(), ApiError> {
        let query = query_string(&[("filename", filename)]);
        self.delete(&format!("/api/udfs/{conn_id}?{query}")).await
    }

    // --- terminal ---

    pub async fn execute_command(
        &self,
        conn_id: &str,
        command: &str,
    ) -> Result<TerminalCommand, ApiError> {
        let body = serde_json::json!({ "command": command });
        self.send(HttpMethod::Post, &format!("/api/terminal/{conn_id}"), &body)
            .await
    }

    // --- metrics ---

    pub async fn get_metrics(&self, conn_id: &str) -> Result<ClusterMetrics, ApiError> {
        self.transport.get(&format!("/api/metrics/{conn_id}")).await
    }

    // --- kubernetes clusters ---

    /// All managed clusters, or only those in `namespace`.
    pub async fn list_k8s_clusters(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<K8sClusterSummary>, ApiError> {
        let path = match namespace {
            Some(ns) => format!("/api/k8s/clusters?{}", query_string(&[("namespace", ns)])),
            None => "/api/k8s/clusters".to_string(),
        };
        self.transport.get(&path).await
    }

    pub async fn get_k8s_cluster(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<K8sClusterDetail, ApiError> {
        self.transport
            .get(&format!("/api/k8s/clusters/{namespace}/{name}"))
            .await
    }

    pub async fn create_k8s_cluster(
        &self,
        request: &CreateK8sClusterRequest,
    ) -> Result<K8sClusterSummary, ApiError> {
        self.send(HttpMethod::Post, "/api/k8s/clusters", request)
            .await
    }

    pub async fn update_k8s_cluster(
        &self,
        namespace: &str,
        name: &str,
        request: &UpdateK8sClusterRequest,
    ) -> Result<K8sClusterSummary, ApiError> {
        self.send(
            HttpMethod::Patch,
            &format!("/api/k8s/clusters/{namespace}/{name}"),
            request,
        )
        .await
    }

    pub async fn delete_k8s_cluster(&self, namespace: &str, name: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/k8s/clusters/{namespace}/{name}"))
            .await
    }

    pub async fn scale_k8s_cluster(
        &self,
        namespace: &str,
        name: &str,
        size: u8,
    ) -> Result<K8sClusterSummary, ApiError> {
        self.send(
            HttpMethod::Post,
            &format!("/api/k8s/clusters/{namespace}/{name}/scale"),
            &ScaleK8sClusterRequest { size },
        )
        .await
    }

    pub async fn list_k8s_namespaces(&self) -> Result<Vec<String>, ApiError> {
        self.transport.get("/api/k8s/namespaces").await
    }

    pub async fn list_k8s_storage_classes(&self) -> Result<Vec<String>, ApiError> {
        self.transport.get("/api/k8s/storageclasses").await
    }
}

fn query_string(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
