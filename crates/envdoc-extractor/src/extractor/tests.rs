use super::*;
use envdoc_schema::ElementField;

const GATEWAY: &str = "package config

type Config struct {
\t// Port to listen on
\tListenPort int `json:\"listen_port\"`
\t// Listener settings
\tListen struct {
\t\t// Port to bind
\t\tPort int `json:\"port\"`
\t} `json:\"listen\"`
\tStorage StorageOptions `json:\"storage\"`
\tmax_conn int
\tTargets []Endpoint `json:\"targets,omitempty\"`
\tSecret string `json:\"secret,omitempty\"`
}

type StorageOptions struct {
\t// Redis host
\tHost string `json:\"host\"`
\tPort int `json:\"port\"`
}

type Endpoint struct {
\tHost string `json:\"host\"`
\tPort int `json:\"port,omitempty\"`
}
";

const PUMP: &str = "package config

type TykPumpConfiguration struct {
\tPurgeDelay int `json:\"purge_delay\"`
\tPumps map[string]PumpConfig `json:\"pumps\"`
\tOmit bool `json:\"omit_detailed_recording\"`
}

type PumpConfig struct {
\tName string `json:\"name\"`
\tType string `json:\"type\"`
\tMeta map[string]interface{} `json:\"meta\"`
\tTimeout int `json:\"timeout\"`
}
";

const KAFKA: &str = "package pumps

// @PumpConf Kafka
type KafkaConf struct {
\tBroker []string `json:\"broker\"`
}
";

const LOG: &str = "package pumps

// @PumpConf Log
type LogConf struct {
\tLevel string `json:\"log_level\"`
}
";

fn keys(nodes: &[VariableNode]) -> Vec<&str> {
    nodes.iter().map(VariableNode::key).collect()
}

fn find<'n>(nodes: &'n [VariableNode], key: &str) -> Option<&'n VariableNode> {
    nodes.iter().find(|node| node.key() == key)
}

fn plugin_deps() -> DependencyMap {
    let mut deps = DependencyMap::new();
    deps.add_plugin_module(SourceBlob::new("pumps/kafka.go", KAFKA));
    deps.add_plugin_module(SourceBlob::new("pumps/log.go", LOG));
    deps
}

#[test]
fn test_gateway_node_order() -> Result<(), ExtractError> {
    let deps = DependencyMap::new();
    let nodes = extract("Config", &SourceBlob::new("config.go", GATEWAY), "GW", &deps)?;
    assert_eq!(
        keys(&nodes),
        vec![
            "ListenPort",
            "Listen.Port",
            "Storage",
            "Storage_Host",
            "Storage_Port",
            "max_conn",
            "Targets",
            "Secret",
        ]
    );
    Ok(())
}

#[test]
fn test_env_names_top_level_and_nested() -> Result<(), ExtractError> {
    let deps = DependencyMap::new();
    let nodes = extract("Config", &SourceBlob::new("config.go", GATEWAY), "GW", &deps)?;

    let listen_port = find(&nodes, "ListenPort");
    assert_eq!(listen_port.and_then(VariableNode::env), Some("GW_LISTENPORT"));

    let nested = find(&nodes, "Listen.Port");
    assert_eq!(nested.and_then(VariableNode::env), Some("GW_LISTEN_PORT"));
    assert_eq!(nested.map(VariableNode::json), Some("listen.port"));
    assert_eq!(nested.and_then(VariableNode::description), Some("Port to bind"));

    let host = find(&nodes, "Storage_Host");
    assert_eq!(host.and_then(VariableNode::env), Some("GW_STORAGE_HOST"));
    assert_eq!(host.map(VariableNode::json), Some("storage.host"));
    assert_eq!(host.and_then(VariableNode::description), Some("Redis host"));
    Ok(())
}

#[test]
fn test_header_and_flags() -> Result<(), ExtractError> {
    let deps = DependencyMap::new();
    let nodes = extract("Config", &SourceBlob::new("config.go", GATEWAY), "GW", &deps)?;

    let storage = find(&nodes, "Storage");
    assert!(storage.is_some_and(VariableNode::is_header));
    assert_eq!(storage.map(VariableNode::type_name), Some("StorageOptions"));
    assert_eq!(storage.and_then(VariableNode::env), None);

    let max_conn = find(&nodes, "max_conn");
    assert_eq!(max_conn.map(VariableNode::json), Some("max.conn"));
    assert_eq!(max_conn.and_then(VariableNode::env), Some("GW_MAX_CONN"));

    assert!(find(&nodes, "Secret").is_some_and(|node| !node.required()));
    assert!(find(&nodes, "ListenPort").is_some_and(VariableNode::required));
    Ok(())
}

#[test]
fn test_slice_of_struct_is_array_leaf() -> Result<(), ExtractError> {
    let deps = DependencyMap::new();
    let nodes = extract("Config", &SourceBlob::new("config.go", GATEWAY), "GW", &deps)?;

    let Some(VariableNode::Variable(targets)) = find(&nodes, "Targets") else {
        panic!("Targets should be a leaf variable");
    };
    assert_eq!(targets.env, "GW_TARGETS");
    assert_eq!(targets.type_name, "[]Endpoint");
    assert!(!targets.required);
    assert_eq!(
        targets.nested,
        Some(vec![
            ElementField {
                description: None,
                key: "Host".to_string(),
                json: "host".to_string(),
                type_name: "string".to_string(),
                required: true,
                nested: None,
            },
            ElementField {
                description: None,
                key: "Port".to_string(),
                json: "port".to_string(),
                type_name: "int".to_string(),
                required: false,
                nested: None,
            },
        ])
    );
    Ok(())
}

#[test]
fn test_extraction_is_deterministic() -> Result<(), ExtractError> {
    let deps = plugin_deps();
    let blob = SourceBlob::new("config.go", PUMP);
    let first = Extraction::new(&deps, "TYK_PMP")
        .with_plugins(PluginSettings::default())
        .run("TykPumpConfiguration", &blob)?;
    let second = Extraction::new(&deps, "TYK_PMP")
        .with_plugins(PluginSettings::default())
        .run("TykPumpConfiguration", &blob)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_children_follow_header_in_declaration_order() -> Result<(), ExtractError> {
    let blob = SourceBlob::new(
        "order.go",
        "type Root struct {\n\tA string\n\tB Inner\n\tC string\n}\n\ntype Inner struct {\n\tB1 string\n\tB2 string\n}\n",
    );
    let nodes = extract("Root", &blob, "X", &DependencyMap::new())?;
    assert_eq!(keys(&nodes), vec!["A", "B", "B_B1", "B_B2", "C"]);
    assert!(nodes[1].is_header());
    assert_eq!(nodes[3].env(), Some("X_B_B2"));
    Ok(())
}

#[test]
fn test_missing_struct_yields_empty_result() -> Result<(), ExtractError> {
    let deps = DependencyMap::new();
    let blob = SourceBlob::new("config.go", GATEWAY);
    assert!(extract("Missing", &blob, "GW", &deps)?.is_empty());

    let empty = SourceBlob::new("empty.go", "type Empty struct {}\n");
    assert!(extract("Empty", &empty, "GW", &deps)?.is_empty());
    Ok(())
}

#[test]
fn test_unknown_type_falls_back_to_scalar() -> Result<(), ExtractError> {
    let blob = SourceBlob::new(
        "partial.go",
        "type Root struct {\n\tName string\n\tAuth apidef.AuthConfig `json:\"auth\"`\n}\n",
    );
    let nodes = extract("Root", &blob, "GW", &DependencyMap::new())?;
    assert_eq!(keys(&nodes), vec!["Name", "Auth"]);
    assert_eq!(nodes[1].type_name(), "apidef.AuthConfig");
    assert_eq!(nodes[1].env(), Some("GW_AUTH"));
    Ok(())
}

#[test]
fn test_self_reference_is_not_followed() -> Result<(), ExtractError> {
    let blob = SourceBlob::new(
        "node.go",
        "type Node struct {\n\tName string\n\tChild *Node\n}\n",
    );
    let nodes = extract("Node", &blob, "N", &DependencyMap::new())?;
    assert_eq!(keys(&nodes), vec!["Name", "Child"]);
    assert!(nodes[1].is_header());
    Ok(())
}

#[test]
fn test_cross_module_reference() -> Result<(), ExtractError> {
    let mut deps = DependencyMap::new();
    deps.insert(
        "apidef.AuthConfig",
        SourceBlob::new(
            "apidef/api.go",
            "type AuthConfig struct {\n\tKey string `json:\"key\"`\n\tHeader string `json:\"header,omitempty\"`\n}\n",
        ),
    );
    let blob = SourceBlob::new(
        "config.go",
        "type Config struct {\n\tAuth *apidef.AuthConfig `json:\"auth\"`\n}\n",
    );
    let nodes = extract("Config", &blob, "GW", &deps)?;
    assert_eq!(keys(&nodes), vec!["Auth", "Auth_Key", "Auth_Header"]);
    assert_eq!(nodes[0].type_name(), "*apidef.AuthConfig");
    assert_eq!(nodes[1].env(), Some("GW_AUTH_KEY"));
    assert_eq!(nodes[1].json(), "auth.key");
    assert!(!nodes[2].required());
    Ok(())
}

#[test]
fn test_expand_directive_splices_dependency_fields() -> Result<(), ExtractError> {
    let mut deps = DependencyMap::new();
    deps.insert(
        "apidef.AuthConfig",
        SourceBlob::new(
            "apidef/api.go",
            "type AuthConfig struct {\n\t// Auth key\n\tKey string `json:\"key\"`\n\tHeader string `json:\"header,omitempty\"`\n}\n",
        ),
    );
    let blob = SourceBlob::new(
        "config.go",
        "type Config struct {\n\t// TYKCONFIGEXPAND\n\tapidef.AuthConfig\n\tPort int `json:\"port\"`\n}\n",
    );
    let nodes = extract("Config", &blob, "GW", &deps)?;
    assert_eq!(keys(&nodes), vec!["Key", "Header", "Port"]);
    assert_eq!(nodes[0].env(), Some("GW_KEY"));
    assert_eq!(nodes[0].description(), Some("Auth key"));
    assert!(!nodes[1].required());
    Ok(())
}

#[test]
fn test_unresolved_directive_is_dropped() -> Result<(), ExtractError> {
    let blob = SourceBlob::new(
        "config.go",
        "type Config struct {\n\t// TYKCONFIGEXPAND\n\tapidef.Missing `json:\"missing\"`\n\tPort int `json:\"port\"`\n}\n",
    );
    let nodes = extract("Config", &blob, "GW", &DependencyMap::new())?;
    assert_eq!(keys(&nodes), vec!["Port"]);
    Ok(())
}

#[test]
fn test_map_declarator_reapplied_to_children() -> Result<(), ExtractError> {
    let blob = SourceBlob::new(
        "config.go",
        "type Config struct {\n\tHosts map[string]Endpoint `json:\"hosts\"`\n\tTags map[string]string `json:\"tags\"`\n}\n\ntype Endpoint struct {\n\tURL string `json:\"url\"`\n}\n",
    );
    let nodes = extract("Config", &blob, "GW", &DependencyMap::new())?;
    assert_eq!(keys(&nodes), vec!["Hosts", "Hosts_URL", "Tags"]);
    assert_eq!(nodes[1].type_name(), "map[string]string");
    assert_eq!(nodes[2].type_name(), "map[string]string");
    Ok(())
}

#[test]
fn test_type_aliases_are_normalized() -> Result<(), ExtractError> {
    let blob = SourceBlob::new(
        "config.go",
        "type Config struct {\n\tStrategy IPsHandleStrategy\n\tEnv EnvMapString\n\tPerms UserPermissionObject\n\tKind MongoType\n}\n",
    );
    let nodes = extract("Config", &blob, "GW", &DependencyMap::new())?;
    let types: Vec<&str> = nodes.iter().map(VariableNode::type_name).collect();
    assert_eq!(
        types,
        vec!["string", "map[string]string", "map[ObjectGroup]string", "int"]
    );
    Ok(())
}

#[test]
fn test_plugin_placeholder_substitution() -> Result<(), ExtractError> {
    let deps = plugin_deps();
    let nodes = Extraction::new(&deps, "TYK_PMP")
        .with_plugins(PluginSettings::default())
        .run("TykPumpConfiguration", &SourceBlob::new("config.go", PUMP))?;

    assert_eq!(
        keys(&nodes),
        vec![
            "PurgeDelay",
            "Pumps",
            "Pumps.Kafka_Name",
            "Pumps.Kafka_Type",
            "Pumps.Kafka_Timeout",
            "Broker",
            "Pumps.Log_Name",
            "Pumps.Log_Type",
            "Pumps.Log_Timeout",
            "Level",
            "Omit",
        ]
    );
    assert!(nodes.iter().all(|node| !node.mentions(PLACEHOLDER)));

    let kafka_name = find(&nodes, "Pumps.Kafka_Name");
    assert_eq!(kafka_name.and_then(VariableNode::env), Some("TYK_PMP_PUMPS_KAFKA_NAME"));
    assert_eq!(kafka_name.map(VariableNode::json), Some("pumps.kafka.name"));

    let log_name = find(&nodes, "Pumps.Log_Name");
    assert_eq!(log_name.and_then(VariableNode::env), Some("TYK_PMP_PUMPS_LOG_NAME"));
    assert_eq!(log_name.map(VariableNode::json), Some("pumps.log.name"));

    let broker = find(&nodes, "Broker");
    assert_eq!(
        broker.and_then(VariableNode::env),
        Some("TYK_PMP_PUMPS_KAFKA_META_BROKER")
    );
    assert_eq!(broker.map(VariableNode::json), Some("pumps.kafka.meta.broker"));
    assert_eq!(broker.map(VariableNode::type_name), Some("[]string"));

    let level = find(&nodes, "Level");
    assert_eq!(level.map(VariableNode::json), Some("pumps.log.meta.log_level"));
    Ok(())
}

#[test]
fn test_without_plugin_settings_meta_is_plain_leaf() -> Result<(), ExtractError> {
    let deps = plugin_deps();
    let nodes = extract(
        "TykPumpConfiguration",
        &SourceBlob::new("config.go", PUMP),
        "TYK_PMP",
        &deps,
    )?;
    assert_eq!(
        keys(&nodes),
        vec![
            "PurgeDelay",
            "Pumps",
            "Pumps_Name",
            "Pumps_Type",
            "Pumps_Meta",
            "Pumps_Timeout",
            "Omit",
        ]
    );
    assert_eq!(nodes[2].type_name(), "map[string]string");
    Ok(())
}

#[test]
fn test_plugins_without_modules_emit_no_templates() -> Result<(), ExtractError> {
    let deps = DependencyMap::new();
    let nodes = Extraction::new(&deps, "TYK_PMP")
        .with_plugins(PluginSettings::default())
        .run("TykPumpConfiguration", &SourceBlob::new("config.go", PUMP))?;
    assert_eq!(keys(&nodes), vec!["PurgeDelay", "Pumps", "Omit"]);
    Ok(())
}

#[test]
fn test_unterminated_nested_block_fails() {
    let blob = SourceBlob::new(
        "broken.go",
        "type Config struct {\n\tListen struct {\n\t\tPort int\n}\n",
    );
    let result = extract("Config", &blob, "GW", &DependencyMap::new());
    assert_eq!(
        result,
        Err(ExtractError::UnterminatedBlock("Listen".to_string()))
    );
}

#[test]
fn test_crlf_source_inlines_nested_struct() -> Result<(), ExtractError> {
    let deps = DependencyMap::new();
    let unix = extract("Config", &SourceBlob::new("config.go", GATEWAY), "GW", &deps)?;
    let blob = SourceBlob::new("config.go", GATEWAY.replace('\n', "\r\n"));
    let nodes = extract("Config", &blob, "GW", &deps)?;
    assert_eq!(nodes, unix);

    let nested = find(&nodes, "Listen.Port");
    assert_eq!(nested.map(VariableNode::json), Some("listen.port"));
    assert_eq!(nested.map(VariableNode::type_name), Some("int"));
    assert!(find(&nodes, "Listen").is_none());
    Ok(())
}

#[test]
fn test_crlf_expand_directive() -> Result<(), ExtractError> {
    let mut deps = DependencyMap::new();
    deps.insert(
        "apidef.AuthConfig",
        SourceBlob::new(
            "apidef/api.go",
            "type AuthConfig struct {\r\n\tKey string `json:\"key\"`\r\n}\r\n",
        ),
    );
    let blob = SourceBlob::new(
        "config.go",
        "type Config struct {\r\n\t// TYKCONFIGEXPAND\r\n\tapidef.AuthConfig\r\n\tPort int `json:\"port\"`\r\n}\r\n",
    );
    let nodes = extract("Config", &blob, "GW", &deps)?;
    assert_eq!(keys(&nodes), vec!["Key", "Port"]);
    Ok(())
}

#[test]
fn test_comment_example_is_not_a_variable() -> Result<(), ExtractError> {
    let blob = SourceBlob::new(
        "config.go",
        "type Config struct {\n\t// Example:\n\t//\tlisten_port 8080\n\n\tPort int `json:\"port\"`\n}\n",
    );
    let nodes = extract("Config", &blob, "GW", &DependencyMap::new())?;
    assert_eq!(keys(&nodes), vec!["Port"]);
    assert_eq!(nodes[0].type_name(), "int");
    Ok(())
}
