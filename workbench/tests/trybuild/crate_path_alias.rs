//! Trybuild fixture verifying `crate = "..."` with a `use ... as` rename.

use std::sync::Arc;

use workbench as bench;
use bench::{BuilderContext, Builders, Model, Persistence, TypeRegistry, builders, overrides};

#[derive(Debug, Default, Model)]
#[workbench(crate = "bench")]
struct Widget {
    label: Option<String>,
}

impl Persistence for Widget {}

struct Shop {
    builders: Builders,
}

impl BuilderContext for Shop {
    fn builders(&self) -> &Builders {
        &self.builders
    }
}

#[builders(crate = "bench")]
impl Shop {
    fn widget_defaults(w: &mut Widget, n: u64) {
        w.label.get_or_insert_with(|| format!("Widget {n}"));
    }
}

fn main() -> bench::Result<()> {
    let registry = Arc::new(TypeRegistry::new());
    registry.register::<Widget>()?;
    let builders = Builders::new(registry).with_sequences(Default::default());
    Shop::declare_builders(&builders)?;
    let shop = Shop { builders };
    let widget = shop.new_widget(&overrides! {})?;
    assert_eq!(widget.label.as_deref(), Some("Widget 1"));
    Ok(())
}
