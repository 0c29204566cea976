use crate::errors::Result;
use crate::wings::{WingsConnection, WingsResponse};

use super::OK;

/// Node-level endpoints under `/api/system`
pub struct SystemService<'a> {
    connection: &'a WingsConnection,
}

impl<'a> SystemService<'a> {
    pub fn new(connection: &'a WingsConnection) -> Self {
        Self { connection }
    }

    pub fn info(&self) -> Result<WingsResponse> {
        let data = self.connection.system_info(false)?;
        Ok(WingsResponse::new(data, OK))
    }

    /// `?v=2` payload: docker, kernel and hardware details
    pub fn detailed_info(&self) -> Result<WingsResponse> {
        let data = self.connection.system_info(true)?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn ips(&self) -> Result<WingsResponse> {
        let data = self.connection.system_ips()?;
        Ok(WingsResponse::new(data, OK))
    }

    /// CPU, memory and disk usage of the node
    pub fn utilization(&self) -> Result<WingsResponse> {
        let data = self.connection.get("/api/system/utilization", &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn docker_disk_usage(&self) -> Result<WingsResponse> {
        let data = self.connection.get("/api/system/docker/disk", &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    /// Remove dangling docker images
    pub fn prune_docker_images(&self) -> Result<WingsResponse> {
        let data = self.connection.delete("/api/system/docker/image/prune", &[])?;
        Ok(WingsResponse::new(data, OK))
    }
}
