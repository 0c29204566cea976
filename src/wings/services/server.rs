use std::fmt;

use serde_json::{Value, json};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::errors::Result;
use crate::wings::{WingsConnection, WingsResponse};

use super::{ACCEPTED, CREATED, NO_CONTENT, OK, server_endpoint};

/// Power signal sent to `/api/servers/{uuid}/power`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PowerAction {
    Start,
    Stop,
    Restart,
    Kill,
}

impl PowerAction {
    /// Seconds the daemon waits for the action to settle
    pub fn wait_seconds(&self) -> u64 {
        match self {
            PowerAction::Kill => 60,
            _ => 30,
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Server lifecycle endpoints
pub struct ServerService<'a> {
    connection: &'a WingsConnection,
}

impl<'a> ServerService<'a> {
    pub fn new(connection: &'a WingsConnection) -> Self {
        Self { connection }
    }

    /// All servers on the node; the array is keyed by index
    pub fn list(&self) -> Result<WingsResponse> {
        let data = self.connection.get("/api/servers", &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn get(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self.connection.get(&server_endpoint(server_uuid, ""), &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn create(&self, server: &Value) -> Result<WingsResponse> {
        let data = self.connection.post("/api/servers", server, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn delete(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self.connection.delete(&server_endpoint(server_uuid, ""), &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn power(&self, server_uuid: &str, action: PowerAction) -> Result<WingsResponse> {
        let body = json!({
            "action": action.as_ref(),
            "wait_seconds": action.wait_seconds(),
        });
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/power"), &body, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn start(&self, server_uuid: &str) -> Result<WingsResponse> {
        self.power(server_uuid, PowerAction::Start)
    }

    pub fn stop(&self, server_uuid: &str) -> Result<WingsResponse> {
        self.power(server_uuid, PowerAction::Stop)
    }

    pub fn restart(&self, server_uuid: &str) -> Result<WingsResponse> {
        self.power(server_uuid, PowerAction::Restart)
    }

    pub fn kill(&self, server_uuid: &str) -> Result<WingsResponse> {
        self.power(server_uuid, PowerAction::Kill)
    }

    /// Last `lines` lines of console output
    pub fn logs(&self, server_uuid: &str, lines: u32) -> Result<WingsResponse> {
        let endpoint = server_endpoint(server_uuid, &format!("/logs?lines={}", lines));
        let data = self.connection.get(&endpoint, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn send_command(&self, server_uuid: &str, command: &str) -> Result<WingsResponse> {
        self.send_commands(server_uuid, &[command.to_string()])
    }

    pub fn send_commands(&self, server_uuid: &str, commands: &[String]) -> Result<WingsResponse> {
        let body = json!({ "commands": commands });
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/commands"), &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn install(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/install"), &Value::Null, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn reinstall(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/reinstall"), &Value::Null, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    /// Ask the daemon to re-fetch the server configuration from the panel
    pub fn sync(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/sync"), &Value::Null, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn install_logs(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self
            .connection
            .get(&server_endpoint(server_uuid, "/install-logs"), &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    /// Drop open websocket and SFTP sessions of `user_uuid` on this server
    pub fn deauthorize_user(&self, user_uuid: &str, server_uuid: &str) -> Result<WingsResponse> {
        let body = json!({
            "user": user_uuid,
            "servers": [server_uuid],
        });
        let data = self.connection.post("/api/deauthorize-user", &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    // ============================================================
    // 防火墙规则
    // ============================================================

    pub fn firewall_rules(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self
            .connection
            .get(&server_endpoint(server_uuid, "/firewall"), &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn firewall_rule(&self, server_uuid: &str, rule_id: u64) -> Result<WingsResponse> {
        let endpoint = server_endpoint(server_uuid, &format!("/firewall/{}", rule_id));
        let data = self.connection.get(&endpoint, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn create_firewall_rule(&self, server_uuid: &str, rule: &Value) -> Result<WingsResponse> {
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/firewall"), rule, &[])?;
        Ok(WingsResponse::new(data, CREATED))
    }

    pub fn update_firewall_rule(
        &self,
        server_uuid: &str,
        rule_id: u64,
        rule: &Value,
    ) -> Result<WingsResponse> {
        let endpoint = server_endpoint(server_uuid, &format!("/firewall/{}", rule_id));
        let data = self.connection.put(&endpoint, rule, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn delete_firewall_rule(&self, server_uuid: &str, rule_id: u64) -> Result<WingsResponse> {
        let endpoint = server_endpoint(server_uuid, &format!("/firewall/{}", rule_id));
        let data = self.connection.delete(&endpoint, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn firewall_rules_by_port(&self, server_uuid: &str, port: u16) -> Result<WingsResponse> {
        let endpoint = server_endpoint(server_uuid, &format!("/firewall/port/{}", port));
        let data = self.connection.get(&endpoint, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    /// Re-apply the stored rules to iptables
    pub fn sync_firewall_rules(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self.connection.post(
            &server_endpoint(server_uuid, "/firewall/sync"),
            &Value::Null,
            &[],
        )?;
        Ok(WingsResponse::new(data, ACCEPTED))
    }

    // ============================================================
    // 反向代理
    // ============================================================

    pub fn create_proxy(&self, server_uuid: &str, proxy: &Value) -> Result<WingsResponse> {
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/proxy/create"), proxy, &[])?;
        Ok(WingsResponse::new(data, ACCEPTED))
    }

    pub fn delete_proxy(&self, server_uuid: &str, domain: &str, port: &str) -> Result<WingsResponse> {
        let body = json!({ "domain": domain, "port": port });
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/proxy/delete"), &body, &[])?;
        Ok(WingsResponse::new(data, ACCEPTED))
    }

    /// Pull server files from a remote SFTP/FTP host
    pub fn import(&self, server_uuid: &str, import: &Value) -> Result<WingsResponse> {
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/import"), import, &[])?;
        Ok(WingsResponse::new(data, ACCEPTED))
    }

    // ============================================================
    // FastDL
    // ============================================================

    pub fn fastdl(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self
            .connection
            .get(&server_endpoint(server_uuid, "/fastdl"), &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    /// `settings` may carry a `directory`; `None` sends `{}`
    pub fn enable_fastdl(&self, server_uuid: &str, settings: Option<&Value>) -> Result<WingsResponse> {
        let data = self.connection.post(
            &server_endpoint(server_uuid, "/fastdl/enable"),
            settings.unwrap_or(&Value::Null),
            &[],
        )?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn disable_fastdl(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self.connection.post(
            &server_endpoint(server_uuid, "/fastdl/disable"),
            &Value::Null,
            &[],
        )?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn update_fastdl(&self, server_uuid: &str, settings: &Value) -> Result<WingsResponse> {
        let data = self
            .connection
            .put(&server_endpoint(server_uuid, "/fastdl"), settings, &[])?;
        Ok(WingsResponse::new(data, OK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_power_action_parse_and_display() {
        assert_eq!(PowerAction::from_str("start").unwrap(), PowerAction::Start);
        assert_eq!(PowerAction::from_str("KILL").unwrap(), PowerAction::Kill);
        assert!(PowerAction::from_str("explode").is_err());
        assert_eq!(PowerAction::Restart.to_string(), "restart");
    }

    #[test]
    fn test_wait_seconds() {
        assert_eq!(PowerAction::Kill.wait_seconds(), 60);
        assert_eq!(PowerAction::Start.wait_seconds(), 30);
        assert_eq!(PowerAction::Stop.wait_seconds(), 30);
    }
}
