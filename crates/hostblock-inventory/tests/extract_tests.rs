//! Extraction over parsed inventories.

use hostblock_inventory::{
    Error, ExtractOptions, InventoryFormat, MISSING_ADDRESS, extract, parse_inventory,
};
use pretty_assertions::assert_eq;

fn body_for(content: &str, group: &str) -> hostblock_inventory::Result<String> {
    let inventory = parse_inventory(content, InventoryFormat::Auto)?;
    Ok(extract(&inventory, group, &ExtractOptions::default())?.render())
}

#[test]
fn test_ini_group_with_missing_address() {
    let body = body_for("[web]\na ansible_host=10.0.0.1\nb ansible_host=\"\"\n", "web").unwrap();
    assert_eq!(body, "10.0.0.1\ta\n# no ip\tb\n");
}

#[test]
fn test_yaml_group_with_missing_address() {
    let content = "all:\n  children:\n    web:\n      hosts:\n        a:\n          ansible_host: 10.0.0.1\n        b:\n";
    let body = body_for(content, "web").unwrap();
    assert_eq!(body, "10.0.0.1\ta\n# no ip\tb\n");
}

#[test]
fn test_host_order_is_not_sorted() {
    let body = body_for("[web]\nzeta ansible_host=1.1.1.1\nalpha ansible_host=2.2.2.2\n", "web").unwrap();
    assert_eq!(body, "1.1.1.1\tzeta\n2.2.2.2\talpha\n");
}

#[test]
fn test_address_written_untrimmed_and_unvalidated() {
    let inventory = parse_inventory("[web]\na ansible_host=not-an-ip\n", InventoryFormat::Ini).unwrap();
    let body = extract(&inventory, "web", &ExtractOptions::default()).unwrap();
    assert_eq!(body.lines()[0].address, "not-an-ip");
    assert_ne!(body.lines()[0].address, MISSING_ADDRESS);
}

#[test]
fn test_group_var_address_is_used() {
    let body = body_for("[web]\na\n\n[web:vars]\nansible_host=10.9.9.9\n", "web").unwrap();
    assert_eq!(body, "10.9.9.9\ta\n");
}

#[test]
fn test_missing_group() {
    let result = body_for("[web]\na\n", "staging");
    assert!(matches!(result, Err(Error::GroupNotFound { group }) if group == "staging"));
}

#[test]
fn test_empty_group_gives_empty_body() {
    let inventory = parse_inventory("[empty]\n[web]\na\n", InventoryFormat::Ini).unwrap();
    let body = extract(&inventory, "empty", &ExtractOptions::default()).unwrap();
    assert_eq!(body.len(), 0);
    assert_eq!(body.render(), "");
}

#[test]
fn test_yaml_hosts_directly_under_all_are_ungrouped() {
    let content = "all:\n  hosts:\n    a:\n      ansible_host: 10.0.0.5\n  children:\n    web:\n      hosts:\n        w:\n";
    assert_eq!(body_for(content, "ungrouped").unwrap(), "10.0.0.5\ta\n");
    assert_eq!(body_for(content, "all").unwrap(), "10.0.0.5\ta\n# no ip\tw\n");
}

#[test]
fn test_range_with_empty_start_counts_from_zero() {
    let body = body_for("[web]\nw[:2]\n", "web").unwrap();
    assert_eq!(body, "# no ip\tw0\n# no ip\tw1\n# no ip\tw2\n");
}
