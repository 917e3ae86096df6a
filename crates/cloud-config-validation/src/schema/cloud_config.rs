//! The cloud-config schema.

use super::{Schema, StructSchema};
use once_cell::sync::Lazy;
use regex::Regex;

/// Schema of a whole cloud-config document, built once per process.
///
/// Field names are written in their normalized (`_`) spelling.
pub static CLOUD_CONFIG: Lazy<Schema> = Lazy::new(|| {
    Schema::structure(
        StructSchema::new()
            .field("ssh_authorized_keys", Schema::strings())
            .field("coreos", coreos())
            .field("write_files", Schema::list(write_file()))
            .field("hostname", pattern(HOSTNAME))
            .field("users", Schema::list(user()))
            .field("manage_etc_hosts", pattern(r"^(localhost|)$")),
    )
});

const HOSTNAME: &str = r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$";

fn pattern(re: &str) -> Schema {
    Schema::string_matching(Regex::new(re).expect("cloud-config schema pattern must compile"))
}

/// Add every name as a plain string field.
fn strings(schema: StructSchema, names: &[&str]) -> StructSchema {
    names
        .iter()
        .fold(schema, |schema, name| schema.field(*name, Schema::string()))
}

fn coreos() -> Schema {
    Schema::structure(
        StructSchema::new()
            .field("etcd", etcd())
            .field("etcd2", etcd2())
            .field("flannel", flannel())
            .field("fleet", fleet())
            .field("locksmith", locksmith())
            .field("oem", oem())
            .field("update", update())
            .field("units", Schema::list(unit())),
    )
}

fn etcd() -> Schema {
    let schema = strings(
        StructSchema::new(),
        &[
            "addr",
            "bind_addr",
            "ca_file",
            "cert_file",
            "cors",
            "data_dir",
            "discovery",
            "http_read_timeout",
            "http_write_timeout",
            "key_file",
            "name",
            "peer_addr",
            "peer_bind_addr",
            "peer_ca_file",
            "peer_cert_file",
            "peer_key_file",
            "peers",
            "peers_file",
        ],
    );
    Schema::structure(
        schema
            .field("cluster_active_size", Schema::Int)
            .field("cluster_remove_delay", Schema::Float)
            .field("cluster_sync_interval", Schema::Float)
            .field("graceful_shutdown_timeout", Schema::Float)
            .field("max_result_buffer", Schema::Int)
            .field("max_retry_attempts", Schema::Int)
            .field("peer_election_timeout", Schema::Int)
            .field("peer_heartbeat_interval", Schema::Int)
            .field("retry_interval", Schema::Float)
            .field("snapshot", Schema::Bool)
            .field("snapshot_count", Schema::Int)
            .field("strtrace", Schema::Bool)
            .field("verbose", Schema::Bool)
            .field("very_verbose", Schema::Bool),
    )
}

fn etcd2() -> Schema {
    let schema = strings(
        StructSchema::new(),
        &[
            "advertise_client_urls",
            "ca_file",
            "cert_file",
            "client_cert_auth",
            "cors",
            "data_dir",
            "discovery",
            "discovery_fallback",
            "discovery_proxy",
            "discovery_srv",
            "initial_advertise_peer_urls",
            "initial_cluster",
            "initial_cluster_state",
            "initial_cluster_token",
            "key_file",
            "listen_client_urls",
            "listen_peer_urls",
            "log_package_levels",
            "name",
            "peer_ca_file",
            "peer_cert_file",
            "peer_key_file",
            "proxy",
            "trusted_ca_file",
            "wal_dir",
        ],
    );
    Schema::structure(
        schema
            .field("debug", Schema::Bool)
            .field("election_timeout", Schema::Int)
            .field("heartbeat_interval", Schema::Int)
            .field("max_snapshots", Schema::Int)
            .field("max_wals", Schema::Int)
            .field("peer_client_cert_auth", Schema::Bool)
            .field("proxy_dial_timeout", Schema::Int)
            .field("proxy_failure_wait", Schema::Int)
            .field("proxy_read_timeout", Schema::Int)
            .field("proxy_refresh_interval", Schema::Int)
            .field("proxy_write_timeout", Schema::Int)
            .field("snapshot_count", Schema::Int),
    )
}

fn flannel() -> Schema {
    Schema::structure(strings(
        StructSchema::new(),
        &[
            "etcd_cafile",
            "etcd_certfile",
            "etcd_endpoints",
            "etcd_keyfile",
            "etcd_prefix",
            "interface",
            "ip_masq",
            "public_ip",
            "subnet_file",
        ],
    ))
}

fn fleet() -> Schema {
    let schema = strings(
        StructSchema::new(),
        &[
            "agent_ttl",
            "etcd_cafile",
            "etcd_certfile",
            "etcd_keyfile",
            "etcd_key_prefix",
            "etcd_servers",
            "metadata",
            "public_ip",
        ],
    );
    Schema::structure(
        schema
            .field("disable_engine", Schema::Bool)
            .field("engine_reconcile_interval", Schema::Float)
            .field("etcd_request_timeout", Schema::Float)
            .field("token_limit", Schema::Int)
            .field("verbosity", Schema::Int)
            .field("verify_units", Schema::Bool),
    )
}

fn locksmith() -> Schema {
    Schema::structure(strings(
        StructSchema::new(),
        &[
            "endpoint",
            "etcd_cafile",
            "etcd_certfile",
            "etcd_keyfile",
            "group",
            "window_length",
            "window_start",
        ],
    ))
}

fn oem() -> Schema {
    Schema::structure(strings(
        StructSchema::new(),
        &["bug_report_url", "home_url", "id", "name", "version_id"],
    ))
}

fn update() -> Schema {
    Schema::structure(
        strings(StructSchema::new(), &["group", "server"]).field(
            "reboot_strategy",
            pattern(r"^(best-effort|etcd-lock|reboot|off)$"),
        ),
    )
}

fn unit() -> Schema {
    let drop_in = strings(StructSchema::new(), &["name", "content"]);
    Schema::structure(
        strings(StructSchema::new(), &["name", "content"])
            .field("mask", Schema::Bool)
            .field("enable", Schema::Bool)
            .field("runtime", Schema::Bool)
            .field(
                "command",
                pattern(r"^(start|stop|restart|reload|try-restart|reload-or-restart|reload-or-try-restart)$"),
            )
            .field("drop_ins", Schema::list(Schema::structure(drop_in))),
    )
}

fn write_file() -> Schema {
    Schema::structure(
        strings(StructSchema::new(), &["content", "owner", "path"])
            .field(
                "encoding",
                pattern(r"^(base64|b64|gz|gzip|gz\+base64|gzip\+base64|gz\+b64|gzip\+b64)$"),
            )
            .field("permissions", pattern(r"^0?[0-7]{3,4}$")),
    )
}

fn user() -> Schema {
    let schema = strings(
        StructSchema::new(),
        &[
            "name",
            "passwd",
            "coreos_ssh_import_github",
            "coreos_ssh_import_url",
            "gecos",
            "homedir",
            "primary_group",
            "shell",
        ],
    );
    Schema::structure(
        schema
            .field("ssh_authorized_keys", Schema::strings())
            .field("coreos_ssh_import_github_users", Schema::strings())
            .field("no_create_home", Schema::Bool)
            .field("groups", Schema::strings())
            .field("no_user_group", Schema::Bool)
            .field("system", Schema::Bool)
            .field("no_log_init", Schema::Bool),
    )
}
