//! Static cheat sheets shown next to the command runner.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlossaryEntry {
    pub command: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Abbreviation {
    pub short: &'static str,
    pub resource: &'static str,
}

const fn entry(command: &'static str, description: &'static str) -> GlossaryEntry {
    GlossaryEntry {
        command,
        description,
    }
}

const fn abbr(short: &'static str, resource: &'static str) -> Abbreviation {
    Abbreviation { short, resource }
}

/// The twenty most used kubectl invocations.
pub static GLOSSARY: &[GlossaryEntry] = &[
    entry("kubectl get nodes", "List every node in the cluster."),
    entry("kubectl get pods", "List every pod in the current namespace."),
    entry(
        "kubectl apply -f [file]",
        "Create or update resources from a configuration file.",
    ),
    entry("kubectl delete pod [pod]", "Delete a specific pod."),
    entry(
        "kubectl get services",
        "List every service in the current namespace.",
    ),
    entry(
        "kubectl describe pod [pod]",
        "Show detailed information about a specific pod.",
    ),
    entry("kubectl logs [pod]", "Print the logs of a specific pod."),
    entry(
        "kubectl exec -it [pod] -- [command]",
        "Run a command inside a specific pod.",
    ),
    entry(
        "kubectl get deployment",
        "List every deployment in the current namespace.",
    ),
    entry(
        "kubectl scale deployment [deployment] --replicas=[count]",
        "Change the replica count of a deployment.",
    ),
    entry(
        "kubectl rollout status deployment/[deployment]",
        "Check the rollout status of a deployment.",
    ),
    entry(
        "kubectl set image deployment/[deployment] [container]=[image]:[tag]",
        "Update the image of a deployment.",
    ),
    entry("kubectl get namespace", "List every namespace."),
    entry("kubectl config view", "Show the current kubectl configuration."),
    entry(
        "kubectl create namespace [namespace]",
        "Create a new namespace.",
    ),
    entry(
        "kubectl port-forward [pod] [local-port]:[pod-port]",
        "Forward a pod port to the local machine.",
    ),
    entry(
        "kubectl get events",
        "List the events of the current namespace.",
    ),
    entry("kubectl attach [pod] -i", "Attach to a running container."),
    entry(
        "kubectl run [name] --image=[image]",
        "Start a new pod running the given image.",
    ),
    entry(
        "kubectl delete -f [file]",
        "Delete resources described by a configuration file.",
    ),
];

/// Short names kubectl accepts in place of resource types.
pub static ABBREVIATIONS: &[Abbreviation] = &[
    abbr("po", "Pods"),
    abbr("rs", "ReplicaSets"),
    abbr("deploy", "Deployments"),
    abbr("svc", "Services"),
    abbr("ns", "Namespaces"),
    abbr("ing", "Ingresses"),
    abbr("sc", "StorageClasses"),
    abbr("pvc", "PersistentVolumeClaims"),
    abbr("pv", "PersistentVolumes"),
    abbr("sa", "ServiceAccounts"),
    abbr("cm", "ConfigMaps"),
    abbr("sec", "Secrets"),
    abbr("no", "Nodes"),
    abbr("hpa", "HorizontalPodAutoscalers"),
    abbr("job", "Jobs"),
    abbr("cronjob", "CronJobs"),
    abbr("crd", "CustomResourceDefinitions"),
];
