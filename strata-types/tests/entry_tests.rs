use pretty_assertions::assert_eq;
use serde_json::json;
use strata_types::Entry;

fn product_entry() -> Entry {
    Entry::new(
        "product",
        json!({
            "uid": "blt_product_1",
            "title": "Noise Cancelling Headphones",
            "url": "/products/headphones",
            "locale": "en-us",
            "tags": ["audio", "featured"],
            "_version": 4,
            "price": 249.99,
            "stock": 12,
            "discontinued": false,
            "created_at": "2021-03-01T09:15:00.000Z",
            "updated_at": "2022-11-20T18:45:12.345Z",
            "created_by": "blt_user_a",
            "updated_by": "blt_user_b",
            "hero_image": {
                "uid": "blt_asset_1",
                "filename": "hero.png",
                "url": "https://images.example.com/hero.png",
                "content_type": "image/png",
                "file_size": "20489"
            },
            "gallery": [
                {"uid": "blt_asset_2", "url": "https://images.example.com/a.png"},
                {"uid": "blt_asset_3", "url": "https://images.example.com/b.png"}
            ],
            "dimensions": {
                "width_mm": 170,
                "foldable": true
            },
            "variants": [
                {"sku": "HP-BLK"},
                {"sku": "HP-WHT"}
            ],
            "brand": [
                {"uid": "blt_brand_1", "title": "Acme Audio", "tags": ["oem"]},
                {"uid": "blt_brand_2", "title": "Acme Pro"}
            ]
        }),
    )
}

// ── Identity fields ─────────────────────────────────────────────

#[test]
fn identity_accessors() {
    let entry = product_entry();
    assert_eq!(entry.content_type_uid(), "product");
    assert_eq!(entry.uid(), Some("blt_product_1"));
    assert_eq!(entry.title(), Some("Noise Cancelling Headphones"));
    assert_eq!(entry.url(), Some("/products/headphones"));
    assert_eq!(entry.locale(), Some("en-us"));
    assert_eq!(entry.version(), Some(4));
    assert_eq!(entry.tags(), vec!["audio".to_string(), "featured".to_string()]);
}

#[test]
fn audit_fields() {
    let entry = product_entry();
    assert_eq!(entry.created_by(), Some("blt_user_a"));
    assert_eq!(entry.updated_by(), Some("blt_user_b"));
    let created = entry.created_at().unwrap();
    assert_eq!(created.to_rfc3339(), "2021-03-01T09:15:00+00:00");
    assert!(entry.updated_at().is_some());
}

// ── Typed field accessors ───────────────────────────────────────

#[test]
fn typed_accessors() {
    let entry = product_entry();
    assert_eq!(entry.number("price"), Some(249.99));
    assert_eq!(entry.integer("stock"), Some(12));
    assert_eq!(entry.boolean("discontinued"), Some(false));
    assert_eq!(entry.string("title"), Some("Noise Cancelling Headphones"));
}

#[test]
fn missing_fields_read_as_none() {
    let entry = product_entry();
    assert_eq!(entry.string("no_such_field"), None);
    assert_eq!(entry.number("title"), None); // type mismatch
    assert_eq!(entry.date("price"), None);
    assert!(entry.assets("price").is_empty());
}

#[test]
fn null_fields_read_as_none() {
    let entry = Entry::new("product", serde_json::json!({"subtitle": null}));
    assert_eq!(entry.string("subtitle"), None);
    assert_eq!(entry.value("subtitle"), None);
}

// ── Reference resolution ────────────────────────────────────────

#[test]
fn single_asset_resolution() {
    let entry = product_entry();
    let asset = entry.asset("hero_image").unwrap();
    assert_eq!(asset.uid(), Some("blt_asset_1"));
    assert_eq!(asset.file_name(), Some("hero.png"));
    assert_eq!(asset.content_type(), Some("image/png"));
    assert_eq!(asset.file_size(), Some(20489));
}

#[test]
fn multi_asset_resolution() {
    let entry = product_entry();
    let gallery = entry.assets("gallery");
    assert_eq!(gallery.len(), 2);
    assert_eq!(gallery[1].uid(), Some("blt_asset_3"));
}

#[test]
fn group_resolution() {
    let entry = product_entry();
    let dims = entry.group("dimensions").unwrap();
    assert_eq!(dims.integer("width_mm"), Some(170));
    assert_eq!(dims.boolean("foldable"), Some(true));

    let variants = entry.groups("variants");
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0].string("sku"), Some("HP-BLK"));
}

#[test]
fn referenced_entries_bind_to_their_content_type() {
    let entry = product_entry();
    let brands = entry.all_entries("brand", "brand");
    assert_eq!(brands.len(), 2);
    assert_eq!(brands[0].content_type_uid(), "brand");
    assert_eq!(brands[0].uid(), Some("blt_brand_1"));
    assert_eq!(brands[0].tags(), vec!["oem".to_string()]);
    assert_eq!(brands[1].title(), Some("Acme Pro"));
}

#[test]
fn reference_resolution_is_lenient() {
    let entry = product_entry();
    assert!(entry.all_entries("nonexistent", "brand").is_empty());
    // scalar field resolved as a reference list yields nothing
    assert!(entry.all_entries("price", "brand").is_empty());
    assert!(entry.group("price").is_none());
}

#[test]
fn nested_group_recursion() {
    let entry = Entry::new(
        "page",
        json!({
            "sections": [
                {
                    "heading": "Specs",
                    "blocks": [{"kind": "table"}],
                    "icon": {"uid": "blt_asset_9", "url": "https://images.example.com/i.svg"}
                }
            ]
        }),
    );

    let sections = entry.groups("sections");
    let blocks = sections[0].groups("blocks");
    assert_eq!(blocks[0].string("kind"), Some("table"));
    assert_eq!(sections[0].asset("icon").unwrap().uid(), Some("blt_asset_9"));
}
