/*!
 * Network Host
 * Host name / port pairs and their resolution
 */

use super::types::{NetError, NetResult};
use crate::core::types::Port;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

/// A remote endpoint named by host and port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkHost {
    host: String,
    port: Port,
}

impl NetworkHost {
    pub fn new(host: impl Into<String>, port: Port) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host from a host-order IPv4 address
    pub fn from_ipv4(address: u32, port: Port) -> Self {
        Self::new(Ipv4Addr::from(address).to_string(), port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Port {
        self.port
    }

    /// Resolve to socket addresses, in resolver order
    pub fn resolve(&self) -> NetResult<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|source| NetError::Resolve {
                host: self.to_string(),
                source,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(NetError::NoAddress(self.to_string()));
        }
        Ok(addrs)
    }
}

impl From<SocketAddr> for NetworkHost {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port())
    }
}

impl fmt::Display for NetworkHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
