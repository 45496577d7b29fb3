//! Model types shared by the crate's unit tests.

use std::cell::RefCell;
use std::sync::Arc;

use crate::{Model, Overrides, Persistence, PersistenceError, TypeRegistry};

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub(crate) struct User {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub active: Option<bool>,
    #[workbench(skip)]
    pub saves: u32,
}

impl Persistence for User {
    fn save(&mut self) -> Option<bool> {
        self.saves += 1;
        Some(true)
    }
}

impl User {
    pub(crate) const fn is_new_record(&self) -> bool {
        self.saves == 0
    }
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[workbench(path = "Admin::User")]
pub(crate) struct AdminUser {
    pub name: Option<String>,
}

impl Persistence for AdminUser {}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub(crate) struct Account {
    pub email: Option<String>,
    #[workbench(skip)]
    pub strict_saves: u32,
    #[workbench(skip)]
    pub plain_saves: u32,
}

impl Persistence for Account {
    fn save_strict(&mut self) -> Option<Result<(), PersistenceError>> {
        Some(if self.email.is_some() {
            self.strict_saves += 1;
            Ok(())
        } else {
            Err("email can't be blank".into())
        })
    }

    fn save(&mut self) -> Option<bool> {
        self.plain_saves += 1;
        Some(true)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub(crate) struct Ghost {
    pub label: Option<String>,
}

impl Persistence for Ghost {}

thread_local! {
    static STORED: RefCell<Vec<Stored>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub(crate) struct Stored {
    pub name: Option<String>,
}

impl Stored {
    pub(crate) fn rows() -> Vec<Self> {
        STORED.with_borrow(Clone::clone)
    }
}

impl Persistence for Stored {
    fn save(&mut self) -> Option<bool> {
        STORED.with_borrow_mut(|rows| rows.push(self.clone()));
        Some(true)
    }

    fn find_where(filter: &Overrides) -> Option<Result<Vec<Self>, PersistenceError>> {
        Some(Ok(STORED.with_borrow(|rows| {
            rows.iter()
                .filter(|row| {
                    filter.iter().all(|(key, value)| {
                        crate::Attributes::attribute(*row, key).as_ref() == Some(value)
                    })
                })
                .cloned()
                .collect()
        })))
    }
}

pub(crate) fn registry() -> Arc<TypeRegistry> {
    let registry = TypeRegistry::new();
    for result in [
        registry.register::<User>(),
        registry.register::<AdminUser>(),
        registry.register::<Account>(),
        registry.register::<Ghost>(),
        registry.register::<Stored>(),
    ] {
        if let Err(err) = result {
            panic!("test registry: {err}");
        }
    }
    Arc::new(registry)
}
