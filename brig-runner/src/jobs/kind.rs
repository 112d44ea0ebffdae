//! Kubernetes-in-docker recipe
//!
//! A kind job boots a throwaway cluster inside its container. It needs a
//! privileged container and host mounts, so the executor must allow them.

use brig_core::domain::job::{Job, VolumeSpec};

pub const KIND_JOB_IMAGE: &str = "brigadecore/golang-kind:1.15.8-v0.10.0";

/// Node image version understood by the kind release in `KIND_JOB_IMAGE`
pub const DEFAULT_KUBERNETES_VERSION: &str = "v1.20.2";

/// Cluster creation is slow: 30 minutes
pub const KIND_TIMEOUT_MS: u64 = 1_800_000;

/// Builds a job with a running kind cluster
///
/// Extend it with `Job::append_tasks`; the cluster is deleted when the
/// container exits, whatever the exit code.
pub fn kind_job(
    name: impl Into<String>,
    image: Option<&str>,
    kubernetes_version: Option<&str>,
) -> Job {
    let kubernetes_version = kubernetes_version.unwrap_or(DEFAULT_KUBERNETES_VERSION);

    Job::new(name, image.unwrap_or(KIND_JOB_IMAGE))
        .privileged(true)
        .with_timeout_ms(KIND_TIMEOUT_MS)
        .with_volume(VolumeSpec::host_path("modules", "/lib/modules", "/lib/modules").read_only())
        .with_volume(VolumeSpec::host_path(
            "cgroup",
            "/sys/fs/cgroup",
            "/sys/fs/cgroup",
        ))
        .with_volume(VolumeSpec::empty_dir("docker-graph-storage", "/var/lib/docker"))
        .with_tasks([
            "trap 'kind delete cluster' EXIT".to_string(),
            "dockerd-entrypoint.sh &".to_string(),
            "sleep 20".to_string(),
            format!(
                "kind create cluster --image kindest/node:{} --wait 300s",
                kubernetes_version
            ),
            "kind get kubeconfig > kind-kubeconfig".to_string(),
            "chmod 400 kind-kubeconfig".to_string(),
            "export KUBECONFIG=$(pwd)/kind-kubeconfig".to_string(),
            // drop in-cluster settings that point at the host cluster
            "unset $(env | grep KUBERNETES_ | xargs)".to_string(),
            "kubectl cluster-info".to_string(),
            "kubectl get pods --all-namespaces".to_string(),
            // kind --wait does not cover DNS pods
            "sleep 60".to_string(),
        ])
}
