//! Domain models shared by the integration tests.
//!
//! Persistence is backed by `static` in-memory tables, so tests touching
//! them run under `#[serial]` and clear the tables first.

use std::sync::Arc;

use workbench::{Model, Overrides, Persistence, PersistenceError, TypeRegistry};
use workbench_test_helpers::Table;

pub static USERS: Table<User> = Table::new();

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct User {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub active: Option<bool>,
    #[workbench(skip)]
    pub persisted: bool,
}

impl User {
    pub const fn is_new_record(&self) -> bool {
        !self.persisted
    }
}

impl Persistence for User {
    fn save(&mut self) -> Option<bool> {
        self.persisted = true;
        USERS.save(self)
    }

    fn find_where(filter: &Overrides) -> Option<Result<Vec<Self>, PersistenceError>> {
        USERS.find_where(filter)
    }
}

pub mod admin {
    use workbench::{Model, Persistence};

    #[derive(Debug, Default, Clone, PartialEq, Model)]
    #[workbench(namespace = "admin")]
    pub struct User {
        pub name: Option<String>,
    }

    impl Persistence for User {}
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Post {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl Persistence for Post {
    fn save_strict(&mut self) -> Option<Result<(), PersistenceError>> {
        Some(match self.title {
            Some(_) => Ok(()),
            None => Err("title can't be blank".into()),
        })
    }
}

/// Registry holding every model above.
pub fn registry() -> anyhow::Result<Arc<TypeRegistry>> {
    let registry = TypeRegistry::new();
    registry.register::<User>()?;
    registry.register::<admin::User>()?;
    registry.register::<Post>()?;
    Ok(Arc::new(registry))
}
