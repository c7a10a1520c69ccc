//! Label names shared between the compiler and the collector.

/// Namespace of the discovered pod.
pub const META_NAMESPACE: &str = "__meta_kubernetes_namespace";
/// Prefix of the discovered pod's own labels (name sanitized).
pub const META_POD_LABEL_PREFIX: &str = "__meta_kubernetes_pod_label_";
/// Prefix of the synthetic "label is present" signal.
pub const META_POD_LABEL_PRESENT_PREFIX: &str = "__meta_kubernetes_pod_labelpresent_";
pub const META_POD_NAME: &str = "__meta_kubernetes_pod_name";
pub const META_POD_IP: &str = "__meta_kubernetes_pod_ip";
pub const META_POD_CONTAINER_PORT_NAME: &str = "__meta_kubernetes_pod_container_port_name";
/// Address the collector actually scrapes.
pub const ADDRESS_LABEL: &str = "__address__";

pub const KEY_PROJECT_ID: &str = "project_id";
pub const KEY_LOCATION: &str = "location";
pub const KEY_CLUSTER: &str = "cluster";
pub const KEY_NAMESPACE: &str = "namespace";
pub const KEY_JOB: &str = "job";
pub const KEY_INSTANCE: &str = "instance";

/// Target labels owned by the generated schema. User mappings may not write them.
pub const RESERVED_LABELS: [&str; 6] = [
    KEY_PROJECT_ID,
    KEY_LOCATION,
    KEY_CLUSTER,
    KEY_NAMESPACE,
    KEY_JOB,
    KEY_INSTANCE,
];

/// Returns true if `label` is one of the reserved identity labels.
pub fn is_reserved_label(label: &str) -> bool {
    RESERVED_LABELS.contains(&label)
}

/// Environment variable the config-reloader sidecar substitutes with the node name.
pub const ENV_VAR_NODE_NAME: &str = "NODE_NAME";
