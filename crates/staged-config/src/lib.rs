//! # staged-config - generate a configure-product config from a staged product
//!
//! For CLI usage see `staged-config --help`.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `staged-config` works internally.
//!
//! ### Terms
//!
//! - a **staged product** is a product whose settings can still be edited before it gets deployed
//! - its settings are **properties**, each addressed by a **property path**
//! - a **selector** property chooses between named branches of properties
//! - a **collection** property holds a list of rows, each row is a set of named properties
//! - a **credential** property holds a secret value that is not part of the property listing
//!
//! ### Fetching
//!
//! Everything comes from the remote API through [api::StagedConfigService]
//! ([http::HttpService] in production). Calls are blocking and made one after another. Any
//! failing call aborts the run, there is no partial output.
//!
//! ### Extraction
//!
//! see [extract::Extractor]
//!
//! Every configurable property with a value is turned into a `{ value: ... }` node. Credentials
//! are handled according to the [credential::RevealPolicy] of the run:
//!
//! | policy        | `.properties.db` (`simple_credentials`)                                                   |
//! |---------------|-------------------------------------------------------------------------------------------|
//! | `Reveal`      | `{ value: { identity: admin, password: hunter2 } }` (fetched from the deployed product)  |
//! | `Placeholder` | `{ value: { identity: ((.properties.db.identity)), password: ((.properties.db.password)) } }` |
//! | `Omit`        | _no node_                                                                                 |
//!
//! Collection rows are extracted field by field with the synthesized path
//! `<collection>[<row>].<field>`, so a credential in row 1 becomes `((.properties.col[1].key.secret))`.
//!
//! ### Selector pruning
//!
//! see [selector]
//!
//! Property paths are decomposed ([path::PropertyPath]) into an explicit tree ([path::PathTree]).
//! Selector branches that were not chosen, and their children, are removed from that tree before the
//! remaining nodes are flattened back into `path -> node`.
//!
//! ### Output
//!
//! [document::StagedConfig] has three sections: `product-properties`, `network-properties`
//! (passed through) and `resource-config` (per job, passed through). All maps are sorted by key
//! so the output is reproducible.
//!
pub mod api;
pub mod config;
pub mod credential;
pub mod document;
pub mod extract;
pub mod http;
pub mod path;
pub mod property;
pub mod selector;
pub mod value;
