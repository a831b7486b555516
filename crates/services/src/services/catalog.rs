//! The kubectl command catalog behind the group and command pickers.

use std::collections::HashMap;

use executors::SubcommandPolicy;
use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CommandGroup {
    pub name: &'static str,
    pub commands: &'static [CommandEntry],
}

const fn cmd(name: &'static str, description: &'static str) -> CommandEntry {
    CommandEntry { name, description }
}

static GROUPS: &[CommandGroup] = &[
    CommandGroup {
        name: "Basic Commands (Beginner)",
        commands: &[
            cmd("create", "Create a resource from a file or from stdin"),
            cmd("expose", "Expose it as a new Kubernetes service"),
            cmd("run", "Run a particular image on the cluster"),
            cmd("set", "Set specific features on objects"),
        ],
    },
    CommandGroup {
        name: "Basic Commands (Intermediate)",
        commands: &[
            cmd("explain", "Get documentation for a resource"),
            cmd("get", "Display one or many resources"),
            cmd("edit", "Edit a resource on the server"),
            cmd("delete", "Delete resources by various methods"),
        ],
    },
    CommandGroup {
        name: "Deploy Commands",
        commands: &[
            cmd("rollout", "Manage the rollout of a resource"),
            cmd(
                "scale",
                "Set a new size for a deployment, replica set, or replication controller",
            ),
            cmd(
                "autoscale",
                "Auto-scale a deployment, replica set, stateful set, or replication controller",
            ),
        ],
    },
    CommandGroup {
        name: "Cluster Management Commands",
        commands: &[
            cmd("certificate", "Modify certificate resources"),
            cmd("cluster-info", "Display cluster information"),
            cmd("top", "Display resource (CPU/memory) usage"),
            cmd("cordon", "Mark node as unschedulable"),
            cmd("uncordon", "Mark node as schedulable"),
            cmd("drain", "Drain node in preparation for maintenance"),
            cmd("taint", "Update the taints on one or more nodes"),
        ],
    },
    CommandGroup {
        name: "Troubleshooting and Debugging Commands",
        commands: &[
            cmd(
                "describe",
                "Show details of a specific resource or group of resources",
            ),
            cmd("logs", "Print the logs for a container in a pod"),
            cmd("attach", "Attach to a running container"),
            cmd("exec", "Execute a command in a container"),
            cmd("port-forward", "Forward one or more local ports to a pod"),
            cmd("proxy", "Run a proxy to the Kubernetes API server"),
            cmd("cp", "Copy files and directories to and from containers"),
            cmd("auth", "Inspect authorization"),
            cmd(
                "debug",
                "Create debugging sessions for troubleshooting workloads and nodes",
            ),
            cmd("events", "List events"),
        ],
    },
    CommandGroup {
        name: "Advanced Commands",
        commands: &[
            cmd("diff", "Diff the live version against a would-be applied version"),
            cmd(
                "apply",
                "Apply a configuration to a resource by file name or stdin",
            ),
            cmd("patch", "Update fields of a resource"),
            cmd("replace", "Replace a resource by file name or stdin"),
            cmd(
                "wait",
                "Wait for a specific condition on one or many resources",
            ),
            cmd(
                "kustomize",
                "Build a kustomization target from a directory or URL",
            ),
        ],
    },
    CommandGroup {
        name: "Settings Commands",
        commands: &[
            cmd("label", "Update the labels on a resource"),
            cmd("annotate", "Update the annotations on a resource"),
            cmd(
                "completion",
                "Output shell completion code for the specified shell (bash, zsh, fish, or powershell)",
            ),
        ],
    },
    CommandGroup {
        name: "Other Commands",
        commands: &[
            cmd(
                "api-resources",
                "Print the supported API resources on the server",
            ),
            cmd(
                "api-versions",
                "Print the supported API versions on the server, in the form of \"group/version\"",
            ),
            cmd("config", "Modify kubeconfig files"),
            cmd("plugin", "Provides utilities for interacting with plugins"),
            cmd("version", "Print the client and server version information"),
        ],
    },
];

lazy_static! {
    static ref CATALOG: CommandCatalog = CommandCatalog::new(GROUPS);
}

/// Read-only view over the command groups, in display order.
#[derive(Debug)]
pub struct CommandCatalog {
    groups: &'static [CommandGroup],
    by_command: HashMap<&'static str, (&'static CommandGroup, &'static CommandEntry)>,
}

impl CommandCatalog {
    fn new(groups: &'static [CommandGroup]) -> Self {
        let by_command = groups
            .iter()
            .flat_map(|group| group.commands.iter().map(move |entry| (entry.name, (group, entry))))
            .collect();
        Self { groups, by_command }
    }

    /// The process-wide catalog.
    pub fn global() -> &'static CommandCatalog {
        &CATALOG
    }

    pub fn groups(&self) -> &'static [CommandGroup] {
        self.groups
    }

    pub fn group_names(&self) -> Vec<&'static str> {
        self.groups.iter().map(|group| group.name).collect()
    }

    pub fn group(&self, name: &str) -> Option<&'static CommandGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Commands of `group` in catalog order; unknown groups have none.
    pub fn commands(&self, group: &str) -> &'static [CommandEntry] {
        self.group(group).map(|group| group.commands).unwrap_or(&[])
    }

    pub fn description(&self, group: &str, command: &str) -> Option<&'static str> {
        self.commands(group)
            .iter()
            .find(|entry| entry.name == command)
            .map(|entry| entry.description)
    }

    /// Locate a command regardless of its group.
    pub fn find(&self, command: &str) -> Option<(&'static CommandGroup, &'static CommandEntry)> {
        self.by_command.get(command).copied()
    }
}

impl SubcommandPolicy for CommandCatalog {
    fn allows(&self, subcommand: &str) -> bool {
        self.find(subcommand).is_some()
    }
}
