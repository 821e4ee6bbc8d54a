//! DTOs for the admin API.
//!
//! # Design
//! Field names follow the backend's camelCase JSON. Bin values are kept as
//! `serde_json::Value` since a bin can hold any JSON shape (scalars, lists,
//! maps, GeoJSON).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A bin name to value map.
pub type Bins = BTreeMap<String, Value>;

// --- connections ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProfile {
    pub id: String,
    pub name: String,
    pub hosts: Vec<String>,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating or updating a connection. Omitted fields are left
/// to the server's defaults (create) or unchanged (update).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    pub node_count: u32,
    pub namespace_count: u32,
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestConnectionRequest {
    pub hosts: Vec<String>,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestConnectionResult {
    pub success: bool,
    pub message: String,
}

// --- cluster ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    pub name: String,
    pub address: String,
    pub port: u16,
    pub build: String,
    pub edition: String,
    pub cluster_size: u32,
    pub uptime: u64,
    pub client_connections: u64,
    #[serde(default)]
    pub statistics: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetInfo {
    pub name: String,
    pub namespace: String,
    pub objects: u64,
    pub tombstones: u64,
    pub memory_data_bytes: u64,
    pub stop_writes_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInfo {
    pub name: String,
    pub objects: u64,
    pub memory_used: u64,
    pub memory_total: u64,
    pub memory_free_pct: u32,
    pub device_used: u64,
    pub device_total: u64,
    pub replication_factor: u32,
    pub stop_writes: bool,
    pub hwm_breached: bool,
    pub high_water_memory_pct: u32,
    pub high_water_disk_pct: u32,
    #[serde(default)]
    pub sets: Vec<SetInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    pub connection_id: String,
    pub nodes: Vec<ClusterNode>,
    pub namespaces: Vec<NamespaceInfo>,
}

// --- records ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordKey {
    pub namespace: String,
    pub set: String,
    pub pk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub generation: u32,
    pub ttl: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub key: RecordKey,
    pub meta: RecordMeta,
    pub bins: Bins,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordListResponse {
    pub records: Vec<Record>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordWriteRequest {
    pub key: RecordKey,
    pub bins: Bins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

// --- query ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredicateOperator {
    Equals,
    Between,
    Contains,
    GeoWithinRegion,
    GeoContainsPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryPredicate {
    pub bin: String,
    pub operator: PredicateOperator,
    pub value: Value,
    /// Upper bound for `Between`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Scan,
    Query,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(rename = "type")]
    pub query_type: QueryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<QueryPredicate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_bins: Option<Vec<String>>,
    /// Raw filter expression, as JSON text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub records: Vec<Record>,
    pub execution_time_ms: u64,
    pub scanned_records: u64,
    pub returned_records: u64,
}

// --- indexes ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Numeric,
    String,
    Geo2dsphere,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexState {
    Ready,
    Building,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecondaryIndex {
    pub name: String,
    pub namespace: String,
    pub set: String,
    pub bin: String,
    #[serde(rename = "type")]
    pub index_type: IndexType,
    pub state: IndexState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateIndexRequest {
    pub namespace: String,
    pub set: String,
    pub bin: String,
    pub name: String,
    #[serde(rename = "type")]
    pub index_type: IndexType,
}

// --- users and roles ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub roles: Vec<String>,
    pub read_quota: u32,
    pub write_quota: u32,
    pub connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Privilege {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    pub privileges: Vec<Privilege>,
    pub whitelist: Vec<String>,
    pub read_quota: u32,
    pub write_quota: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: String,
    pub privileges: Vec<Privilege>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_quota: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_quota: Option<u32>,
}

// --- UDFs ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UdfModule {
    pub filename: String,
    #[serde(rename = "type")]
    pub udf_type: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadUdfRequest {
    pub filename: String,
    pub content: String,
}

// --- terminal ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerminalCommand {
    pub id: String,
    pub command: String,
    pub output: String,
    pub timestamp: String,
    pub success: bool,
}

// --- metrics ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricPoint {
    pub timestamp: u64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSeries {
    pub name: String,
    pub label: String,
    pub data: Vec<MetricPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceMetrics {
    pub namespace: String,
    pub objects: u64,
    pub memory_used: u64,
    pub memory_total: u64,
    pub device_used: u64,
    pub device_total: u64,
    pub read_reqs: u64,
    pub write_reqs: u64,
    pub read_success: u64,
    pub write_success: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetrics {
    pub connection_id: String,
    pub timestamp: u64,
    pub connected: bool,
    pub uptime: u64,
    pub client_connections: u64,
    pub total_read_reqs: u64,
    pub total_write_reqs: u64,
    pub total_read_success: u64,
    pub total_write_success: u64,
    pub namespaces: Vec<NamespaceMetrics>,
    pub read_tps: Vec<MetricPoint>,
    pub write_tps: Vec<MetricPoint>,
    pub connection_history: Vec<MetricPoint>,
    pub memory_usage_by_ns: Vec<MetricSeries>,
    pub device_usage_by_ns: Vec<MetricSeries>,
}

// --- kubernetes clusters ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Memory,
    Device,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStorage {
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceConfig {
    pub name: String,
    pub replication_factor: u8,
    pub storage_engine: NamespaceStorage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorageVolume {
    pub storage_class: String,
    /// Kubernetes quantity, e.g. `10Gi`.
    pub size: String,
    pub mount_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceSpec {
    pub cpu: String,
    pub memory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resources {
    pub requests: ResourceSpec,
    pub limits: ResourceSpec,
}

/// Omitted fields take the server's defaults (namespace `aerospike`, one
/// in-memory `test` namespace, auto-connect on).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateK8sClusterRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<NamespaceConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageVolume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_connect: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateK8sClusterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScaleK8sClusterRequest {
    pub size: u8,
}

fn unknown_phase() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct K8sPodStatus {
    pub name: String,
    #[serde(default, rename = "podIP")]
    pub pod_ip: Option<String>,
    #[serde(default, rename = "hostIP")]
    pub host_ip: Option<String>,
    #[serde(default)]
    pub is_ready: bool,
    #[serde(default = "unknown_phase")]
    pub phase: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct K8sClusterSummary {
    pub name: String,
    pub namespace: String,
    pub size: u32,
    pub image: String,
    #[serde(default = "unknown_phase")]
    pub phase: String,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
}

/// Summary plus the raw custom resource `spec`/`status` and its pods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct K8sClusterDetail {
    pub name: String,
    pub namespace: String,
    pub size: u32,
    pub image: String,
    #[serde(default = "unknown_phase")]
    pub phase: String,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub spec: BTreeMap<String, Value>,
    #[serde(default)]
    pub status: BTreeMap<String, Value>,
    #[serde(default)]
    pub pods: Vec<K8sPodStatus>,
    #[serde(default)]
    pub connection_id: Option<String>,
}

/// `{ "message": ... }` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}
