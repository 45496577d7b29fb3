//! End-to-end behaviour of contexts declared with `#[builders]`.
//!
//! These tests count with the process-wide sequences, so each one resets
//! them and runs serially.

mod common;

use anyhow::{Result, ensure};
use common::{Post, USERS, User, admin, registry};
use rstest::rstest;
use serial_test::serial;
use workbench::{
    BuilderContext, Builders, Overrides, SequenceRegistry, TypeRef, WorkbenchError, builders,
    overrides, reset_counters,
};

struct Fixtures {
    builders: Builders,
}

impl BuilderContext for Fixtures {
    fn builders(&self) -> &Builders {
        &self.builders
    }
}

#[builders]
impl Fixtures {
    fn user_defaults(u: &mut User, n: u64) {
        u.name.get_or_insert_with(|| format!("User {n}"));
        u.phone.get_or_insert_with(|| "999-999-9999".to_owned());
    }

    #[use_class(admin::User)]
    #[count_with("user")]
    fn admin_user_defaults(u: &mut admin::User, n: u64) {
        u.name.get_or_insert_with(|| format!("Admin {n}"));
    }

    #[use_class("user")]
    fn member_defaults(u: &mut User, n: Option<u64>, overrides: Option<&Overrides>) {
        Self::user_defaults(u, n.unwrap_or_default());
        if !overrides.is_some_and(|given| given.contains_key("active")) {
            u.active = Some(true);
        }
    }

    fn post_defaults(p: &mut Post, n: u64, overrides: &Overrides) -> Result<(), String> {
        if overrides.contains_key("author") && !overrides.contains_key("title") {
            return Err("an authored post needs a title".to_owned());
        }
        p.title.get_or_insert_with(|| format!("Post {n}"));
        Ok(())
    }

    fn helper() -> &'static str {
        "not a builder"
    }
}

fn fixtures() -> Result<Fixtures> {
    reset_counters();
    USERS.clear();
    let builders = Builders::new(registry()?);
    Fixtures::declare_builders(&builders)?;
    Ok(Fixtures { builders })
}

fn user_counter() -> u64 {
    SequenceRegistry::global().current(&TypeRef::of::<User>())
}

#[rstest]
#[serial]
fn declares_only_defaults_functions() -> Result<()> {
    let fx = fixtures()?;
    ensure!(
        fx.builders.entities() == ["admin_user", "member", "post", "user"],
        "unexpected entities: {:?}",
        fx.builders.entities()
    );
    ensure!(Fixtures::helper() == "not a builder");
    ensure!(fx.builders.pending().is_empty(), "overrides were all consumed");
    Ok(())
}

#[rstest]
#[serial]
fn shared_counter_interleaves_across_entities() -> Result<()> {
    let fx = fixtures()?;
    let first = fx.new_user(&overrides! {})?;
    let admin = fx.new_admin_user(&overrides! {})?;
    let second = fx.new_user(&overrides! {})?;
    assert_eq!(first.name.as_deref(), Some("User 1"));
    assert_eq!(admin.name.as_deref(), Some("Admin 2"));
    assert_eq!(second.name.as_deref(), Some("User 3"));
    Ok(())
}

#[rstest]
#[serial]
fn overrides_are_applied_before_defaults() -> Result<()> {
    let fx = fixtures()?;
    let bob = fx.new_user(&overrides! { "name" => "Bob" })?;
    assert_eq!(bob.name.as_deref(), Some("Bob"));
    assert_eq!(bob.phone.as_deref(), Some("999-999-9999"));
    assert!(bob.is_new_record());
    assert_eq!(USERS.saves(), 0, "new_ never persists");
    Ok(())
}

#[rstest]
#[serial]
fn counters_reset_between_runs() -> Result<()> {
    let fx = fixtures()?;
    fx.new_user(&overrides! {})?;
    fx.new_user(&overrides! {})?;
    reset_counters();
    let user = fx.new_user(&overrides! {})?;
    assert_eq!(user.name.as_deref(), Some("User 1"));
    Ok(())
}

#[rstest]
#[serial]
fn optional_parameters_receive_counter_and_overrides() -> Result<()> {
    let fx = fixtures()?;
    let active = fx.new_member(&overrides! {})?;
    let inactive = fx.new_member(&overrides! { "active" => false })?;
    assert_eq!(active.active, Some(true));
    assert_eq!(active.name.as_deref(), Some("User 1"));
    assert_eq!(inactive.active, Some(false));
    assert_eq!(inactive.name.as_deref(), Some("User 2"));
    Ok(())
}

#[rstest]
#[serial]
fn fallible_defaults_surface_their_error() -> Result<()> {
    let fx = fixtures()?;
    let err = fx
        .new_post(&overrides! { "author" => "Ann" })
        .expect_err("title is required with an author");
    assert!(matches!(err, WorkbenchError::Defaults(_)));
    assert!(err.to_string().contains("an authored post needs a title"));

    let post = fx.create_post(&overrides! { "author" => "Ann", "title" => "Hello" })?;
    assert_eq!(post.title.as_deref(), Some("Hello"));
    Ok(())
}

#[rstest]
#[serial]
fn create_calls_the_ordinary_save_once() -> Result<()> {
    let fx = fixtures()?;
    let user = fx.create_user(&overrides! { "name" => "Bob" })?;
    assert!(!user.is_new_record());
    assert_eq!(USERS.saves(), 1);
    assert_eq!(USERS.rows(), vec![user]);
    Ok(())
}

#[rstest]
#[serial]
fn find_or_create_returns_an_existing_match() -> Result<()> {
    let fx = fixtures()?;
    USERS.insert(User {
        name: Some("Bob".to_owned()),
        phone: Some("555-0100".to_owned()),
        active: None,
        persisted: true,
    });
    let bob = fx.find_or_create_user(&overrides! { "name" => "Bob" })?;
    assert_eq!(bob.phone.as_deref(), Some("555-0100"));
    assert_eq!(USERS.saves(), 0, "no save for an existing match");
    assert_eq!(user_counter(), 0, "nothing was built");
    assert_eq!(USERS.queries(), 1);
    Ok(())
}

#[rstest]
#[serial]
fn find_or_create_creates_when_nothing_matches() -> Result<()> {
    let fx = fixtures()?;
    let created = fx.find_or_create_user(&overrides! { "name" => "Bob" })?;
    let found = fx.find_or_create_user(&overrides! { "name" => "Bob" })?;
    assert_eq!(created, found);
    assert_eq!(USERS.len(), 1);
    assert_eq!(USERS.saves(), 1);
    assert_eq!(user_counter(), 1);
    Ok(())
}

#[rstest]
#[serial]
fn find_or_create_without_a_query_is_an_error() -> Result<()> {
    let fx = fixtures()?;
    let err = fx
        .find_or_create_admin_user(&overrides! {})
        .expect_err("admin users have no query");
    assert!(matches!(
        err,
        WorkbenchError::MissingCapability { class: "Admin::User", .. }
    ));
    Ok(())
}

#[rstest]
#[serial]
fn unknown_override_keys_are_rejected() -> Result<()> {
    let fx = fixtures()?;
    let err = fx
        .new_user(&overrides! { "nickname" => "Bobby" })
        .expect_err("User has no nickname");
    assert_eq!(err.to_string(), "unknown attribute 'nickname' for User");
    Ok(())
}
