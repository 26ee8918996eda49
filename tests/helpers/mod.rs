#![allow(dead_code)]

use std::cell::Cell;
use std::future::Future;
use std::io;

use result_graph::flags::DomainFlags;
use result_graph::ingest::FileSource;
use result_graph::parse::EntityNode;
use serde_json::json;

// =============================================================================
// Tree builders
// =============================================================================

/// Root with one recent subdomain, matching the documented example.
pub fn krypton_tree() -> EntityNode {
    EntityNode::domain("krypton.ninja")
        .with_connection(EntityNode::domain("beta.krypton.ninja").with_flags(DomainFlags::from_bits(2)))
}

/// Three levels, every kind, extra attributes on each.
pub fn mixed_tree() -> EntityNode {
    EntityNode::domain("krypton.ninja")
        .with_data("is_root", json!(true))
        .with_connection(
            EntityNode::domain("github.krypton.ninja")
                .with_flags(DomainFlags::from_bits(4))
                .with_data("possible_takeover_platform", json!("github"))
                .with_connection(EntityNode::file("https://github.krypton.ninja/CNAME")),
        )
        .with_connection(
            EntityNode::email("root@krypton.ninja").with_data("breaches", json!(["2019"])),
        )
        .with_connection(EntityNode::of_type("asn", "AS13335").with_data("org", json!("Cloudflare")))
}

// =============================================================================
// File sources
// =============================================================================

/// File source that records how many times its contents were read.
pub struct TrackedFile {
    pub content_type: String,
    pub contents: String,
    pub reads: Cell<usize>,
}

impl TrackedFile {
    pub fn new(content_type: &str, contents: &str) -> Self {
        TrackedFile {
            content_type: content_type.into(),
            contents: contents.into(),
            reads: Cell::new(0),
        }
    }
}

impl FileSource for TrackedFile {
    fn name(&self) -> &str {
        "scan.json"
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn read_text(&self) -> impl Future<Output = io::Result<String>> {
        self.reads.set(self.reads.get() + 1);
        std::future::ready(Ok(self.contents.clone()))
    }
}
