//! Built-in content used when no manifest is given

use sn_data::MemorySource;

const DEMO_MANIFEST: &str = r#"{
    "title": "Demo gallery",
    "categories": [
        {
            "id": "landscapes",
            "title": "Landscapes",
            "items": [
                { "id": "dunes", "caption": "Dunes at dawn" },
                { "id": "fjord", "caption": "Fjord in fog" },
                { "id": "steppe", "caption": "Open steppe" },
                { "id": "glacier", "caption": "Glacier tongue" }
            ]
        },
        { "id": "drafts", "title": "Drafts" },
        {
            "id": "portraits",
            "title": "Portraits",
            "items": [
                { "id": "potter", "caption": "The potter" },
                { "id": "twins", "caption": "Twins" },
                { "id": "ferryman", "caption": "Ferryman" }
            ]
        },
        {
            "id": "archive",
            "title": "Archive",
            "items": [
                { "id": "ledger", "caption": "Harbour ledger" },
                null,
                { "caption": "Unlabelled plate" },
                { "id": 1907, "caption": "Survey, 1907" },
                { "id": "atlas", "caption": "Pocket atlas" }
            ]
        }
    ]
}"#;

pub fn demo_source() -> MemorySource {
    MemorySource::new("demo", DEMO_MANIFEST)
}
