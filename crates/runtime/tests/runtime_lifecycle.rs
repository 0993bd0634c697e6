use std::sync::Arc;

use game_content::{
    Content, ItemBehavior, ItemDef, NoHostUnlocks, TokenGate, UnlockDescriptor, Visibility,
};
use game_core::{
    AbstractEntity, EntityRecord, HostCatalog, PhysobType, RegistrationError, SaveFile, World,
};
use runtime::{
    ContentRuntime, FileSaveRepository, InMemorySaveRepository, Registration, RuntimeError,
    SaveRepository,
};

fn host() -> HostCatalog {
    HostCatalog::new(
        (0..50).map(|i| format!("Builtin{i}")),
        ["Slugcat"],
        ["Rock", "Spear"],
    )
}

struct Lantern;

impl ItemBehavior for Lantern {
    fn parse(
        &self,
        _world: &dyn World,
        record: &EntityRecord,
        _unlock: Option<&UnlockDescriptor>,
    ) -> anyhow::Result<Option<AbstractEntity>> {
        Ok(Some(AbstractEntity::new(
            PhysobType::Object(record.type_id()),
            record.id(),
            record.pos(),
        )))
    }
}

fn lantern(id: &str) -> Vec<Arc<dyn Content>> {
    let unlock = UnlockDescriptor::new(format!("{id}_unlock"), 0)
        .with_gate(TokenGate::new("lantern_token"));
    vec![Arc::new(ItemDef::new(id, Lantern).with_unlock(unlock))]
}

fn runtime() -> ContentRuntime<InMemorySaveRepository> {
    ContentRuntime::new(&host(), InMemorySaveRepository::new(), "sav")
}

#[test]
fn registration_waits_for_host_start() {
    let mut runtime = runtime();

    let outcome = runtime.register(lantern("glowlantern")).unwrap();
    assert!(matches!(outcome, Registration::Deferred(_)));
    assert!(runtime.context().types().objects.lookup("glowlantern").is_none());

    runtime.host_started().unwrap();
    assert!(runtime.is_started());
    assert!(runtime.context().types().objects.lookup("glowlantern").is_some());

    let outcome = runtime.register(lantern("bluelantern")).unwrap();
    assert_eq!(outcome, Registration::Registered);
    assert!(runtime.context().types().objects.lookup("bluelantern").is_some());
}

#[test]
fn deferred_batches_register_in_arrival_order() {
    let mut runtime = runtime();
    runtime.register(lantern("first")).unwrap();
    runtime.register(lantern("second")).unwrap();
    runtime.host_started().unwrap();

    let objects = &runtime.context().types().objects;
    assert_eq!(objects.lookup("first").map(|ty| ty.0), Some(50));
    assert_eq!(objects.lookup("second").map(|ty| ty.0), Some(51));
}

#[test]
fn cancelled_batch_is_never_registered() {
    let mut runtime = runtime();
    let Registration::Deferred(id) = runtime.register(lantern("glowlantern")).unwrap() else {
        panic!("registration should be deferred");
    };

    assert!(runtime.cancel(id));
    assert!(!runtime.cancel(id));
    runtime.host_started().unwrap();

    assert!(runtime.context().types().objects.lookup("glowlantern").is_none());
}

#[test]
fn second_start_is_rejected() {
    let mut runtime = runtime();
    runtime.host_started().unwrap();

    assert!(matches!(
        runtime.host_started(),
        Err(RuntimeError::AlreadyStarted)
    ));
}

#[test]
fn failing_deferred_batch_does_not_block_later_ones() {
    let mut runtime = runtime();
    runtime.register(lantern("glowlantern")).unwrap();
    runtime.register(lantern("GLOWLANTERN")).unwrap();
    runtime.register(lantern("bluelantern")).unwrap();

    let err = runtime.host_started().unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Registration(RegistrationError::DuplicateName { .. })
    ));

    let objects = &runtime.context().types().objects;
    assert!(objects.lookup("glowlantern").is_some());
    assert!(objects.lookup("bluelantern").is_some());
}

#[test]
fn unlocking_a_token_opens_the_gate() {
    let mut runtime = runtime();
    runtime.host_started().unwrap();
    runtime.register(lantern("glowlantern")).unwrap();

    let ty = runtime.context().types().objects.lookup("glowlantern").unwrap();
    let id = runtime.lookup_unlock(PhysobType::Object(ty), 0).unwrap().id;

    assert!(!runtime.is_unlocked(id, &NoHostUnlocks));
    assert_eq!(runtime.visible_unlocks(), vec![(id, Visibility::Locked)]);

    runtime.unlock("lantern_token").unwrap();

    assert!(runtime.is_unlocked(id, &NoHostUnlocks));
    assert_eq!(runtime.visible_unlocks(), vec![(id, Visibility::Unlocked)]);
}

#[test]
fn unlocks_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let repository = FileSaveRepository::new(dir.path(), "profile").unwrap();
        let mut runtime = ContentRuntime::new(&host(), repository, "sav");
        runtime.unlock("lantern_token").unwrap();
        runtime.unlock("lantern_token").unwrap();
    }

    let repository = FileSaveRepository::new(dir.path(), "profile").unwrap();
    let stored = repository.load().unwrap().unwrap();
    assert_eq!(stored.slot("sav").tokens(), ["lantern_token"]);

    let runtime = ContentRuntime::new(&host(), repository, "sav");
    assert!(runtime.active_slot().is_unlocked("lantern_token"));
    assert!(!runtime.save_file().slot("other").is_unlocked("lantern_token"));
}

#[test]
fn missing_save_file_is_created_empty() {
    let repository = InMemorySaveRepository::new();
    let runtime = ContentRuntime::new(&host(), repository, "sav");

    assert_eq!(runtime.save_file(), &SaveFile::default());
    assert!(runtime.active_slot().is_empty());
}
