use crate::codec::PathCodec;
use crate::descriptor::NodeDescriptor;
use crate::errors::SourceError;
use crate::path::NodePath;

/// Remote endpoint supplying node descriptors.
///
/// Implementations fetch one entry's descriptor including its direct
/// children (one level deep). The transport behind a source is up to the
/// host application; the engine only sees descriptors.
pub trait NodeSource {
    /// Fetch the descriptor for `path`, honoring an optional content
    /// filter.
    fn fetch(
        &self,
        path: &NodePath,
        filter: Option<&str>,
    ) -> Result<NodeDescriptor, SourceError>;
}

/// Load one node through a source, applying the engine's failure policy.
///
/// A failed fetch is retried exactly once. When the retry also fails the
/// load is abandoned with a logged warning and `None` is returned; callers
/// must still deliver their completion so no waiting operation and no lock
/// is left pending. Losing data is acceptable, staying locked is not.
///
/// On success the descriptor's own path and each child path are stamped
/// with their render-safe identifiers.
pub fn load_node<S>(
    source: &S,
    codec: &PathCodec,
    path: &NodePath,
    filter: Option<&str>,
) -> Option<NodeDescriptor>
where
    S: NodeSource + ?Sized,
{
    let descriptor = match source.fetch(path, filter) {
        Ok(descriptor) => descriptor,
        Err(first) => match source.fetch(path, filter) {
            Ok(descriptor) => descriptor,
            Err(retry) => {
                log::warn!(
                    "load of {path} abandoned: {first}; retry failed: {retry}"
                );
                return None;
            },
        },
    };

    Some(stamp_identifiers(descriptor, codec))
}

/// Resolve the default fetch URL for a node.
///
/// Appends a `filter` query parameter when a non-default filter is
/// configured. Hosts with custom routing substitute their own resolver and
/// keep the rest of the load path unchanged.
pub fn node_url(base: &str, path: &NodePath, filter: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match filter {
        Some(filter) if !filter.is_empty() => {
            format!("{base}{path}?filter={filter}")
        },
        _ => format!("{base}{path}"),
    }
}

fn stamp_identifiers(
    mut descriptor: NodeDescriptor,
    codec: &PathCodec,
) -> NodeDescriptor {
    descriptor.identifier = Some(codec.encode(&descriptor.path));
    for child in &mut descriptor.children {
        child.identifier = Some(codec.encode(&child.path));
    }
    descriptor
}
