use rbac_domain::entity::Entity;
use rbac_domain::snowflake::Id;
use rbac_macros::entity;

#[entity]
struct Tenant {
    name: String,
}

#[entity(kind = "api_key", debug = false)]
struct ApiKey {
    label: String,
}

fn main() {
    let mut tenant = <Tenant as Entity>::new(Id::new(7));
    tenant.name = "acme".into();
    assert_eq!(Tenant::KIND, "tenant");
    assert_eq!(tenant.id(), Id::new(7));
    assert!(tenant.is_live());
    let _ = format!("{:?}", tenant);

    let key = <ApiKey as Entity>::new(Id::new(8));
    assert_eq!(ApiKey::KIND, "api_key");
    assert!(key.label.is_empty());
}
