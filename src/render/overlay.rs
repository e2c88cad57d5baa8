use serde_json::Value;

use crate::models::{Hotspot, Port};

/// Side length of a port hit box, in displayed pixels
pub const HOTSPOT_SIZE: f64 = 20.0;

/// Port attributes shown in the tooltip, in display order
pub const TOOLTIP_FIELDS: &[(&str, &str)] = &[
    ("name", "Name"),
    ("pci_card", "PCI Card"),
    ("pci_slot", "PCI Slot"),
    ("pci_slot_height", "PCI Slot Height"),
    ("default_card", "Default Card"),
    ("port_type", "Port Type"),
    ("services", "Services"),
    ("port_connector", "Port Connector"),
    ("port_speeds", "Port Speeds"),
    ("port_sfp_present", "SFP Present"),
    ("port_sfp_connector", "SFP Connector"),
    ("port_sfp_speed", "SFP Speed"),
    ("symbol_name", "Symbol"),
];

fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Tooltip text: one `Label: value` line per known attribute present and non-null
pub fn tooltip(port: &Port) -> String {
    TOOLTIP_FIELDS
        .iter()
        .filter_map(|(key, label)| match port.attributes.get(*key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(format!("{}: {}", label, format_value(value))),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Place hot-spots for the displayed image size. Port locations are in
/// natural pixels and are scaled per axis, then centred on the hit box.
pub fn hotspots(ports: &[Port], natural: (u32, u32), displayed: (f64, f64)) -> Vec<Hotspot> {
    let (natural_w, natural_h) = natural;
    if natural_w == 0 || natural_h == 0 {
        return Vec::new();
    }
    let scale_x = displayed.0 / natural_w as f64;
    let scale_y = displayed.1 / natural_h as f64;

    ports
        .iter()
        .map(|port| Hotspot {
            left: port.loc[0] * scale_x - HOTSPOT_SIZE / 2.0,
            top: port.loc[1] * scale_y - HOTSPOT_SIZE / 2.0,
            size: HOTSPOT_SIZE,
            tooltip: tooltip(port),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(json: &str) -> Port {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_tooltip_order_and_formatting() {
        let p = port(
            r#"{"loc":[0,0],"symbol_name":"eth","services":["data","replication"],
                "name":"ct0.eth4","port_sfp_present":true,"pci_slot":2,"default_card":null}"#,
        );
        assert_eq!(
            tooltip(&p),
            "Name: ct0.eth4\nPCI Slot: 2\nServices: data, replication\nSFP Present: Yes\nSymbol: eth"
        );
    }

    #[test]
    fn test_tooltip_false_is_no() {
        let p = port(r#"{"loc":[0,0],"port_sfp_present":false}"#);
        assert_eq!(tooltip(&p), "SFP Present: No");
    }

    #[test]
    fn test_tooltip_ignores_unknown_attributes() {
        let p = port(r#"{"loc":[0,0],"color":"red"}"#);
        assert_eq!(tooltip(&p), "");
    }

    #[test]
    fn test_hotspots_scaled_and_centred() {
        let ports = vec![port(r#"{"loc":[1000,400],"name":"p1"}"#)];
        let spots = hotspots(&ports, (2000, 800), (1000.0, 400.0));
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].left, 500.0 - HOTSPOT_SIZE / 2.0);
        assert_eq!(spots[0].top, 200.0 - HOTSPOT_SIZE / 2.0);
        assert_eq!(spots[0].tooltip, "Name: p1");
    }

    #[test]
    fn test_hotspots_zero_natural_size() {
        let ports = vec![port(r#"{"loc":[10,10]}"#)];
        assert!(hotspots(&ports, (0, 0), (100.0, 100.0)).is_empty());
    }
}
