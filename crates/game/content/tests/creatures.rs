mod common;

use std::sync::Arc;

use common::*;
use game_content::{ContentContext, CreatureBehavior, CreatureDef, HookOutcome};
use game_core::{
    AbstractEntity, CreatureCatalog, CreatureTemplate, EntityId, PhysobType, RegistrationError,
    RelationKind, Relationship, TypeIdentifier, WorldCoordinate,
};

const SLUGCAT: TypeIdentifier = TypeIdentifier(0);
const GREEN_LIZARD: TypeIdentifier = TypeIdentifier(1);
const GLOWWORM: TypeIdentifier = TypeIdentifier(2);
const RED_GLOWWORM: TypeIdentifier = TypeIdentifier(3);

#[test]
fn templates_and_relationships_cover_new_values() {
    let mut cx = context();
    cx.register(&batch([glowworm()])).unwrap();
    let catalog = cx.creature_catalog();

    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.template(GLOWWORM).map(|t| t.ai), Some(true));
    assert_eq!(catalog.top_ancestor(RED_GLOWWORM), Ok(GLOWWORM));
    assert_eq!(catalog.relationship(GLOWWORM, SLUGCAT), Some(FEAR));
    assert_eq!(
        catalog.relationship(SLUGCAT, RED_GLOWWORM),
        Some(Relationship::default())
    );
    assert_eq!(cx.types().creatures.lookup("RedGlowworm"), Some(RED_GLOWWORM));
}

#[test]
fn variants_save_and_load_through_their_owner() {
    let mut cx = context();
    cx.register(&batch([glowworm()])).unwrap();
    let world = TestWorld::default();

    let entity = AbstractEntity::new(
        PhysobType::Creature(RED_GLOWWORM),
        EntityId::new(1, 2),
        WorldCoordinate::new(4, 0, 0, 2),
    )
    .with_data("HP<cC>0.5<cB>");

    let saved = cx.entity_to_string(&entity).handled().unwrap().unwrap();
    assert_eq!(saved, "1.2<oA>redglowworm<oA>4.0.0.2<oA>HP<cC>0.5<cB>");
    assert_eq!(
        cx.creature_from_string(&world, &saved),
        HookOutcome::Handled(Some(entity))
    );
}

#[test]
fn creature_strings_do_not_match_object_space() {
    let mut cx = context();
    cx.register(&batch([glowworm()])).unwrap();
    let world = TestWorld::default();

    assert_eq!(
        cx.object_from_string(&world, "1.2<oA>glowworm<oA>4.0.0.2"),
        HookOutcome::Fallthrough
    );
    assert!(cx.entity_from_string(&world, "1.2<oA>glowworm<oA>4.0.0.2").is_handled());
}

#[test]
fn trophies_consult_the_owning_creature() {
    let mut cx = context();
    cx.register(&batch([glowworm()])).unwrap();

    assert!(cx.kills_matter(RED_GLOWWORM, false));
    assert!(!cx.kills_matter(SLUGCAT, false));
}

struct Missing;

impl CreatureBehavior for Missing {
    fn templates(
        &self,
        _ty: TypeIdentifier,
        variants: &[TypeIdentifier],
    ) -> anyhow::Result<Vec<CreatureTemplate>> {
        Ok(variants
            .iter()
            .map(|&v| CreatureTemplate::new(v, "Orphan"))
            .collect())
    }
}

struct Adopted;

impl CreatureBehavior for Adopted {
    fn templates(
        &self,
        ty: TypeIdentifier,
        variants: &[TypeIdentifier],
    ) -> anyhow::Result<Vec<CreatureTemplate>> {
        let mut templates = vec![CreatureTemplate::new(ty, "Adopted")];
        templates.extend(
            variants
                .iter()
                .map(|&v| CreatureTemplate::new(v, "Stray").with_ancestor(SLUGCAT)),
        );
        Ok(templates)
    }
}

struct Failing;

impl CreatureBehavior for Failing {
    fn templates(
        &self,
        _ty: TypeIdentifier,
        _variants: &[TypeIdentifier],
    ) -> anyhow::Result<Vec<CreatureTemplate>> {
        anyhow::bail!("asset bundle missing")
    }
}

#[test]
fn malformed_creatures_fail_loudly_and_allocate_nothing() {
    let cases: [(CreatureDef, &str); 3] = [
        (CreatureDef::new("missing", Missing), "no template for its own type"),
        (
            CreatureDef::new("adopted", Adopted).with_variant("stray"),
            "must descend from",
        ),
        (CreatureDef::new("failing", Failing), "asset bundle missing"),
    ];

    for (def, reason_fragment) in cases {
        let mut cx = context();
        let err = cx.register(&batch([Arc::new(def)])).unwrap_err();

        match err {
            RegistrationError::Malformed { reason, .. } => {
                assert!(reason.contains(reason_fragment), "{reason}");
            }
            other => panic!("expected malformed content, got {other:?}"),
        }
        assert_eq!(cx.types().creatures.len(), 2);
        assert_eq!(cx.creature_catalog().len(), 2);
    }
}

#[test]
fn host_catalog_templates_and_relationships_are_kept() {
    let hunts = Relationship::new(RelationKind::Eats, 1.0);
    let mut host_catalog = CreatureCatalog::from_builtins(
        vec![
            CreatureTemplate::new(SLUGCAT, "Slugcat").with_ai(false),
            CreatureTemplate::new(GREEN_LIZARD, "GreenLizard").with_ai(true),
        ],
        Relationship::default(),
    );
    host_catalog
        .set_relationship(GREEN_LIZARD, SLUGCAT, hunts)
        .unwrap();

    let mut cx = ContentContext::new(&host()).with_creature_catalog(host_catalog);
    cx.register(&batch([glowworm()])).unwrap();
    let catalog = cx.creature_catalog();

    assert_eq!(catalog.template(GREEN_LIZARD).map(|t| t.ai), Some(true));
    assert_eq!(catalog.relationship(GREEN_LIZARD, SLUGCAT), Some(hunts));
    // New columns copy each host row's first entry.
    assert_eq!(catalog.relationship(GREEN_LIZARD, GLOWWORM), Some(hunts));
    assert_eq!(catalog.relationship(GREEN_LIZARD, RED_GLOWWORM), Some(hunts));
    assert_eq!(catalog.relationship(GLOWWORM, SLUGCAT), Some(FEAR));
}
