use crate::report::Report;
use crate::schema::child;
use cloud_config_yaml::Node;
use url::Url;

/// Check that etcd discovery URLs are absolute URLs with a host.
pub fn check_discovery_url(root: &Node, report: &mut Report) {
    let Some(coreos) = child(root, "coreos") else {
        return;
    };
    for service in ["etcd", "etcd2"] {
        let Some(entry) = child(&coreos.value, service)
            .and_then(|etcd| child(&etcd.value, "discovery"))
        else {
            continue;
        };
        let Some(discovery) = entry.value.as_str() else {
            continue;
        };
        if !is_valid_discovery_url(discovery) {
            report.warning(entry.line(), "discovery URL is not valid");
        }
    }
}

fn is_valid_discovery_url(discovery: &str) -> bool {
    match Url::parse(discovery) {
        Ok(url) => url.host().is_some(),
        Err(err) => {
            tracing::trace!(discovery, %err, "discovery URL does not parse");
            false
        }
    }
}
