//! 端口角色映射

use super::catalog::{canonical_port_role, DEFAULT_PORT_PROTOCOL};
use super::types::{PortDescriptor, PortProfileEntry};

/// 将单个原始端口描述规范化为端口条目
///
/// - 名称转小写后查角色表，查不到时小写名称本身即角色
/// - protocol 缺省为 udp
/// - count 缺省为 1，≤0 时修正为 1
/// - required 缺省为 true，contiguous 缺省为 false（显式值原样保留）
pub fn map_port(port: &PortDescriptor) -> PortProfileEntry {
    let lower = port.name.to_lowercase();
    let role = canonical_port_role(&lower)
        .map(str::to_string)
        .unwrap_or(lower);

    let count = port
        .count
        .filter(|c| *c > 0)
        .map(i64::unsigned_abs)
        .unwrap_or(1);

    PortProfileEntry {
        role,
        protocol: port
            .protocol
            .clone()
            .unwrap_or_else(|| DEFAULT_PORT_PROTOCOL.to_string()),
        count,
        required: port.required.unwrap_or(true),
        contiguous: port.contiguous.unwrap_or(false),
    }
}

/// 按输入顺序构建端口画像，不排序、不去重
pub fn build_port_profile(ports: &[PortDescriptor]) -> Vec<PortProfileEntry> {
    ports.iter().map(map_port).collect()
}

/// 直接从 required_ports 列的 JSON 文本构建端口画像
pub fn build_port_profile_from_json(text: &str) -> Vec<PortProfileEntry> {
    build_port_profile(&PortDescriptor::parse_list_str(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: &str, protocol: &str, count: u64) -> PortProfileEntry {
        PortProfileEntry {
            role: role.to_string(),
            protocol: protocol.to_string(),
            count,
            required: true,
            contiguous: false,
        }
    }

    #[test]
    fn test_known_roles_any_case() {
        for name in ["game", "QUERY", "Rcon", "tV", "VOICE", "FileTransfer"] {
            let mapped = map_port(&PortDescriptor::new(name));
            assert_eq!(mapped.role, name.to_lowercase());
        }
    }

    #[test]
    fn test_unknown_role_passes_through_lowercased() {
        let mapped = map_port(&PortDescriptor::new("Web-Admin"));
        assert_eq!(mapped.role, "web-admin");
    }

    #[test]
    fn test_count_defaults_and_clamps() {
        assert_eq!(map_port(&PortDescriptor::new("game")).count, 1);
        assert_eq!(map_port(&PortDescriptor::new("game").count(0)).count, 1);
        assert_eq!(map_port(&PortDescriptor::new("game").count(-5)).count, 1);
        assert_eq!(map_port(&PortDescriptor::new("game").count(4)).count, 4);
        assert_eq!(
            map_port(&PortDescriptor::new("game").count(i64::MAX)).count,
            i64::MAX as u64
        );
    }

    #[test]
    fn test_explicit_flags_respected() {
        let mapped = map_port(
            &PortDescriptor::new("game")
                .protocol("tcp")
                .required(false)
                .contiguous(true),
        );
        assert_eq!(mapped.protocol, "tcp");
        assert!(!mapped.required);
        assert!(mapped.contiguous);

        let defaulted = map_port(&PortDescriptor::new("game"));
        assert_eq!(defaulted.protocol, "udp");
        assert!(defaulted.required);
        assert!(!defaulted.contiguous);
    }

    #[test]
    fn test_profile_from_json_example() {
        let profile = build_port_profile_from_json(
            r#"[{"name":"Game","protocol":"udp"},{"name":"query","protocol":"udp","count":2}]"#,
        );

        assert_eq!(profile, vec![entry("game", "udp", 1), entry("query", "udp", 2)]);
    }

    #[test]
    fn test_profile_keeps_order_and_duplicates() {
        let profile = build_port_profile_from_json(
            r#"[{"name":"rcon","protocol":"tcp"},"bad",{"name":"game"},{"name":"GAME","protocol":"tcp"}]"#,
        );

        let roles: Vec<&str> = profile.iter().map(|e| e.role.as_str()).collect();
        assert_eq!(roles, vec!["rcon", "game", "game"]);
        assert_eq!(profile[2].protocol, "tcp");
    }
}
