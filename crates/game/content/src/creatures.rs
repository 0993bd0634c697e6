//! Content-defined creatures: definitions, template installation and
//! save-string handling.
//!
//! A creature definition owns one creature value plus any variant values
//! derived from it. Every template it supplies must trace its ancestry back
//! to the definition's own value.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use game_core::{
    AbstractEntity, CreatureCatalog, CreatureTemplate, EntityRecord, PhysobType,
    RegistrationError, TypeIdentifier, TypeTable, TypeTables, World, top_ancestor,
};
use tracing::{debug, error};

use crate::content::{Content, RegistryId, ResourceLoader, downcast};
use crate::hooks::{HookOutcome, HookPoint, HookSet};
use crate::persist::{self, SaveError};
use crate::properties::ItemProperties;
use crate::registry::{RegisterCx, Registry};
use crate::sandbox::UnlockDescriptor;

/// Callbacks a creature type supplies to the host.
#[allow(unused_variables)]
pub trait CreatureBehavior: Send + Sync {
    /// Templates for `ty` and its `variants`, in any order.
    ///
    /// Must include a template for `ty`; every template's top ancestor must
    /// be `ty`.
    fn templates(
        &self,
        ty: TypeIdentifier,
        variants: &[TypeIdentifier],
    ) -> anyhow::Result<Vec<CreatureTemplate>>;

    /// Adjusts relationships once the catalog has grown to include `ty`.
    ///
    /// Runs against a staged copy of the catalog, once while the batch is
    /// validated and again when it is committed.
    fn establish_relationships(
        &self,
        ty: TypeIdentifier,
        catalog: &mut CreatureCatalog,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Rebuilds a creature from its record. Sandbox spawns pass the unlock.
    fn parse(
        &self,
        world: &dyn World,
        record: &EntityRecord,
        unlock: Option<&UnlockDescriptor>,
    ) -> anyhow::Result<Option<AbstractEntity>> {
        Ok(Some(
            AbstractEntity::new(
                PhysobType::Creature(record.type_id()),
                record.id(),
                record.pos(),
            )
            .with_data(record.payload()),
        ))
    }

    fn save(&self, entity: &AbstractEntity) -> String {
        entity.data.clone()
    }

    /// Whether killing `ty` earns a trophy.
    fn kills_matter(&self, ty: TypeIdentifier, earns: &mut bool) {}

    fn properties(&self, entity: &AbstractEntity) -> Option<Arc<dyn ItemProperties>> {
        None
    }

    fn load_resources(&self, resources: &mut dyn ResourceLoader) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A creature type contributed by content.
pub struct CreatureDef {
    id: String,
    variants: Vec<String>,
    ty: OnceLock<TypeIdentifier>,
    unlocks: Vec<UnlockDescriptor>,
    behavior: Box<dyn CreatureBehavior>,
}

impl CreatureDef {
    /// `id` becomes the creature type name.
    pub fn new(id: impl Into<String>, behavior: impl CreatureBehavior + 'static) -> Self {
        Self {
            id: id.into(),
            variants: Vec::new(),
            ty: OnceLock::new(),
            unlocks: Vec::new(),
            behavior: Box::new(behavior),
        }
    }

    /// Declares an extra creature value descending from this one.
    #[must_use]
    pub fn with_variant(mut self, name: impl Into<String>) -> Self {
        self.variants.push(name.into());
        self
    }

    #[must_use]
    pub fn with_unlock(mut self, unlock: UnlockDescriptor) -> Self {
        self.unlocks.push(unlock);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ty(&self) -> Option<PhysobType> {
        self.ty.get().copied().map(PhysobType::Creature)
    }

    pub fn unlocks(&self) -> &[UnlockDescriptor] {
        &self.unlocks
    }

    pub fn behavior(&self) -> &dyn CreatureBehavior {
        self.behavior.as_ref()
    }

    fn names(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.id.as_str()).chain(self.variants.iter().map(String::as_str))
    }

    fn malformed(&self, reason: impl fmt::Display) -> RegistrationError {
        RegistrationError::Malformed {
            content: self.id.clone(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Debug for CreatureDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatureDef")
            .field("id", &self.id)
            .field("variants", &self.variants)
            .field("ty", &self.ty.get())
            .field("unlocks", &self.unlocks)
            .finish_non_exhaustive()
    }
}

impl Content for CreatureDef {
    fn id(&self) -> &str {
        &self.id
    }

    fn registries(&self) -> Vec<RegistryId> {
        vec![
            RegistryId::CREATURES,
            RegistryId::PROPERTIES,
            RegistryId::SANDBOX,
        ]
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Allocates creature values, installs their templates and serves their
/// save strings.
#[derive(Debug, Default)]
pub struct CreatureRegistry {
    creatures: BTreeMap<TypeIdentifier, Arc<CreatureDef>>,
}

/// A batch allocated and installed into copies of the host tables.
struct Staged {
    table: TypeTable,
    catalog: CreatureCatalog,
    defs: Vec<(Arc<CreatureDef>, TypeIdentifier)>,
}

impl CreatureRegistry {
    pub fn get(&self, ty: TypeIdentifier) -> Option<&Arc<CreatureDef>> {
        self.creatures.get(&ty)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CreatureDef>> + '_ {
        self.creatures.values()
    }

    /// Definition owning `ty` directly or through a variant's ancestry.
    pub fn owner_of(
        &self,
        ty: TypeIdentifier,
        catalog: &CreatureCatalog,
    ) -> Option<&Arc<CreatureDef>> {
        let root = catalog.top_ancestor(ty).ok()?;
        self.creatures.get(&root)
    }

    pub(crate) fn entity_from_string(
        &self,
        world: &dyn World,
        raw: &str,
        table: &TypeTable,
        catalog: &CreatureCatalog,
    ) -> HookOutcome<Option<AbstractEntity>> {
        let owns = |ty| self.owner_of(ty, catalog).is_some();
        let record = match persist::decode_owned(raw, table, owns) {
            HookOutcome::Handled(Some(record)) => record,
            HookOutcome::Handled(None) => return HookOutcome::Handled(None),
            HookOutcome::Fallthrough => return HookOutcome::Fallthrough,
        };
        let Some(def) = self.owner_of(record.type_id(), catalog) else {
            return HookOutcome::Fallthrough;
        };

        match def.behavior().parse(world, &record, None) {
            Ok(entity) => HookOutcome::Handled(entity),
            Err(err) => {
                error!(
                    target: "game_content::creatures",
                    content = def.id(),
                    error = %err,
                    "creature parser failed"
                );
                HookOutcome::Handled(None)
            }
        }
    }

    pub(crate) fn entity_to_string(
        &self,
        entity: &AbstractEntity,
        table: &TypeTable,
        catalog: &CreatureCatalog,
    ) -> HookOutcome<Result<String, SaveError>> {
        let PhysobType::Creature(ty) = entity.kind else {
            return HookOutcome::Fallthrough;
        };
        match self.owner_of(ty, catalog) {
            Some(def) => {
                HookOutcome::Handled(persist::encode(table, entity, def.behavior().save(entity)))
            }
            None => HookOutcome::Fallthrough,
        }
    }

    pub(crate) fn kills_matter(
        &self,
        ty: TypeIdentifier,
        catalog: &CreatureCatalog,
        earns: bool,
    ) -> HookOutcome<bool> {
        match self.owner_of(ty, catalog) {
            Some(def) => {
                let mut earns = earns;
                def.behavior().kills_matter(ty, &mut earns);
                HookOutcome::Handled(earns)
            }
            None => HookOutcome::Fallthrough,
        }
    }

    pub(crate) fn load_resources(&self, resources: &mut dyn ResourceLoader) {
        for def in self.creatures.values() {
            if let Err(err) = def.behavior().load_resources(resources) {
                error!(
                    target: "game_content::creatures",
                    content = def.id(),
                    error = %err,
                    "failed to load creature resources"
                );
            }
        }
    }

    /// Allocates and installs a batch into copies of `types` and `catalog`,
    /// then lets every definition establish its relationships there.
    fn stage(
        content: &[Arc<dyn Content>],
        types: &TypeTables,
        catalog: &CreatureCatalog,
    ) -> Result<Staged, RegistrationError> {
        let defs: Vec<Arc<CreatureDef>> =
            content.iter().filter_map(downcast::<CreatureDef>).collect();
        if let Some(def) = defs.iter().find(|def| def.ty.get().is_some()) {
            return Err(RegistrationError::AlreadyAllocated {
                content: def.id.clone(),
            });
        }

        let names: Vec<&str> = defs.iter().flat_map(|def| def.names()).collect();
        let mut table = types.creatures.clone();
        let mut ids = table.allocate(&names)?.into_iter();
        let mut catalog = catalog.clone();

        let mut staged = Vec::with_capacity(defs.len());
        for def in defs {
            let own: Vec<TypeIdentifier> = ids.by_ref().take(1 + def.variants.len()).collect();
            let (&ty, variants) = own
                .split_first()
                .ok_or_else(|| def.malformed("no creature value was allocated"))?;

            let templates = def
                .behavior()
                .templates(ty, variants)
                .map_err(|err| def.malformed(format_args!("templates: {err:#}")))?;
            check_templates(&def, ty, &own, &templates, &catalog)?;

            let len = catalog.len() + own.len();
            catalog
                .install(templates, len)
                .map_err(|err| def.malformed(err))?;
            staged.push((def, ty));
        }

        for (def, ty) in &staged {
            def.behavior()
                .establish_relationships(*ty, &mut catalog)
                .map_err(|err| def.malformed(format_args!("relationships: {err:#}")))?;
        }

        Ok(Staged {
            table,
            catalog,
            defs: staged,
        })
    }
}

/// Every template must belong to the definition and descend from `ty`.
fn check_templates(
    def: &CreatureDef,
    ty: TypeIdentifier,
    own: &[TypeIdentifier],
    templates: &[CreatureTemplate],
    catalog: &CreatureCatalog,
) -> Result<(), RegistrationError> {
    if !templates.iter().any(|t| t.ty == ty) {
        return Err(def.malformed(format_args!("no template for its own type {ty}")));
    }

    let by_type: HashMap<TypeIdentifier, &CreatureTemplate> =
        templates.iter().map(|t| (t.ty, t)).collect();
    for template in templates {
        if !own.contains(&template.ty) {
            return Err(def.malformed(format_args!(
                "template type {} was not allocated to it",
                template.ty
            )));
        }
        let root = top_ancestor(template.ty, |t| {
            by_type.get(&t).copied().or_else(|| catalog.template(t))
        })
        .map_err(|err| def.malformed(err))?;
        if root != ty {
            return Err(def.malformed(format_args!(
                "template {} must descend from {ty}, not {root}",
                template.ty
            )));
        }
    }
    Ok(())
}

impl Registry for CreatureRegistry {
    fn id(&self) -> RegistryId {
        RegistryId::CREATURES
    }

    fn initialize(&mut self, hooks: &mut HookSet) {
        for point in [
            HookPoint::ApplyCreatureTemplates,
            HookPoint::CreatureFromString,
            HookPoint::EntityToString,
            HookPoint::KillsMatter,
            HookPoint::LoadResources,
        ] {
            hooks.subscribe(point, self.id());
        }
    }

    fn validate(
        &self,
        content: &[Arc<dyn Content>],
        types: &TypeTables,
        creatures: &CreatureCatalog,
    ) -> Result<(), RegistrationError> {
        Self::stage(content, types, creatures).map(drop)
    }

    fn process(
        &mut self,
        content: &[Arc<dyn Content>],
        cx: &mut RegisterCx<'_>,
    ) -> Result<(), RegistrationError> {
        let Staged {
            table,
            catalog,
            defs,
        } = Self::stage(content, cx.types, cx.creatures)?;

        cx.types.creatures = table;
        *cx.creatures = catalog;
        for (def, ty) in defs {
            def.ty
                .set(ty)
                .map_err(|_| RegistrationError::AlreadyAllocated {
                    content: def.id.clone(),
                })?;
            debug!(
                target: "game_content::creatures",
                content = def.id(),
                %ty,
                variants = def.variants.len(),
                "creature registered"
            );
            self.creatures.insert(ty, def);
        }
        Ok(())
    }
}
