//! 根据配置打开传输节点

use anyhow::{Context, Result};
use drone_transport::{MemoryTransport, Node, UdpTransport};
use std::sync::Arc;

use crate::config::{TransportKind, TransportSection};

/// 打开传输节点
pub fn open_node(settings: &TransportSection) -> Result<Node> {
    let node = match settings.kind {
        TransportKind::Udp => {
            let transport = UdpTransport::bind(&settings.bind, &settings.peer).with_context(|| {
                format!("无法打开 UDP 传输 (bind {}, peer {})", settings.bind, settings.peer)
            })?;
            tracing::info!(
                "UDP transport ready: {} -> {}",
                transport.local_addr()?,
                transport.peer()
            );
            Node::new(Arc::new(transport))
        },
        TransportKind::Memory => {
            tracing::info!("in-process transport (queue size {})", settings.queue_size);
            Node::new(Arc::new(MemoryTransport::new(settings.queue_size)?))
        },
    };
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory_node() {
        let settings = TransportSection {
            kind: TransportKind::Memory,
            ..Default::default()
        };
        assert!(open_node(&settings).is_ok());
    }

    #[test]
    fn test_udp_bad_peer_is_reported() {
        let settings = TransportSection {
            kind: TransportKind::Udp,
            bind: "127.0.0.1:0".to_string(),
            peer: "nowhere".to_string(),
            ..Default::default()
        };
        let err = open_node(&settings).err().unwrap();
        assert!(format!("{:#}", err).contains("nowhere"), "{:#}", err);
    }
}
