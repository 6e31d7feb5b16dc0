use rbac_macros::entity_id;

#[entity_id]
struct TenantId(u64);

#[entity_id(debug = false)]
struct SecretId(String);

impl std::fmt::Debug for SecretId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretId(..)")
    }
}

fn main() {
    let id = TenantId::new(42);
    assert_eq!(format!("{:?}", id), "TenantId(42)");
    assert_eq!(id.to_string(), "42");
    assert_eq!("42".parse::<TenantId>().unwrap(), id);
    assert_eq!(u64::from(id), 42);

    let sid = SecretId::new("s3cr3t".to_string());
    assert_eq!(format!("{:?}", sid), "SecretId(..)");
    assert_eq!(sid.value(), "s3cr3t");
}
