//! Catalog of RESO reference collections.
//!
//! Every collection seeded by this project is declared here together with the
//! natural key field that must stay unique within it. The schema migration,
//! the copier and the lookup loader all read from this single list.

/// Column holding the fan-out identifier (sandbox server or certification report).
pub const SCOPE_COLUMN: &str = "scope_id";

/// Column holding the JSON body of a document.
pub const DOCUMENT_COLUMN: &str = "document";

/// Auto-increment surrogate key, used for stable read ordering.
pub const ID_COLUMN: &str = "id";

/// Insertion timestamp column.
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Name of the controlled-vocabulary collection.
pub const LOOKUP_COLLECTION: &str = "lookup";

/// A named collection and the field that identifies its documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub key_field: &'static str,
}

impl CollectionSpec {
    pub const fn new(name: &'static str, key_field: &'static str) -> Self {
        Self { name, key_field }
    }

    /// Name of the unique index guarding `key_field`.
    pub fn unique_index_name(&self) -> String {
        format!("idx_{}_{}", self.name, self.key_field.to_ascii_lowercase())
    }
}

/// All collections created by the schema migration, in creation order.
pub const RESO_COLLECTIONS: &[CollectionSpec] = &[
    CollectionSpec::new("property", "ListingKey"),
    CollectionSpec::new("member", "MemberKey"),
    CollectionSpec::new("office", "OfficeKey"),
    CollectionSpec::new("contacts", "ContactKey"),
    CollectionSpec::new("media", "MediaKey"),
    CollectionSpec::new("history_transactional", "HistoryTransactionalKey"),
    CollectionSpec::new("contact_listings", "ContactListingsKey"),
    CollectionSpec::new("internet_tracking", "EventKey"),
    CollectionSpec::new("saved_search", "SavedSearchKey"),
    CollectionSpec::new("open_house", "OpenHouseKey"),
    CollectionSpec::new("prospecting", "ProspectingKey"),
    CollectionSpec::new("queue", "QueueTransactionKey"),
    CollectionSpec::new("rules", "RuleKey"),
    CollectionSpec::new("showing", "ShowingKey"),
    CollectionSpec::new("teams", "TeamKey"),
    CollectionSpec::new("team_members", "TeamMemberKey"),
    CollectionSpec::new("ouid", "OrganizationUniqueIdKey"),
    CollectionSpec::new("contact_listing_notes", "ContactKey"),
    CollectionSpec::new("other_phone", "OtherPhoneKey"),
    CollectionSpec::new(
        "property_green_verification",
        "GreenBuildingVerificationKey",
    ),
    CollectionSpec::new("property_power_production", "PowerProductionKey"),
    CollectionSpec::new("property_rooms", "RoomKey"),
    CollectionSpec::new("property_unit_types", "UnitTypeKey"),
    CollectionSpec::new("social_media", "SocialMediaKey"),
    CollectionSpec::new("field", "FieldKey"),
    CollectionSpec::new(LOOKUP_COLLECTION, "LookupKey"),
];

/// Looks up a catalog entry by collection name.
pub fn find_collection(name: &str) -> Option<&'static CollectionSpec> {
    RESO_COLLECTIONS.iter().find(|spec| spec.name == name)
}
