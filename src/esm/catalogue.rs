//! The catalogue: every per-kind store, filled file by file in load order.
//!
//! Loading is all-or-nothing per file. Records are decoded into a staging
//! batch and only committed to the stores and the resolver once the whole
//! file has parsed.

use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use crate::esm::format::{EsmReader, RecordReader, header};
use crate::esm::options::LoadOptions;
use crate::esm::records::{
    Attribute, Book, Cell, Creature, Door, Land, LandTexture, MagicEffect, Pathgrid, Record,
    Script, Skill, Sound, Static,
};
use crate::esm::resolver::{Reference, Resolver};
use crate::esm::store::{
    Admission, Duplicate, GridStore, IndexedStore, LandTextureStore, NamedStore,
    PartitionedStore, RecordStore,
};
use crate::esm::types::error::{LoadError, Result};
use crate::esm::types::models::{FileHeader, FormId};
use crate::esm::types::tags::Tag;

/// Binds a record kind to the store that holds it.
pub trait StoredIn {
    type Store;

    fn store(catalogue: &Catalogue) -> &Self::Store;
}

/// Outcome of [`Catalogue::load_all`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files committed, in load order.
    pub loaded: Vec<String>,
    /// Files that failed, with the reason; nothing from them was kept.
    pub failed: Vec<(PathBuf, LoadError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Records decoded from one file, not yet visible in the catalogue.
#[derive(Default)]
struct Batch {
    staged: Vec<Staged>,
    defined: Vec<FormId>,
    references: Vec<Reference>,
    warnings: Vec<LoadError>,
    unsupported: usize,
    ignored: usize,
    dropped: usize,
}

macro_rules! catalogue_kinds {
    ($($variant:ident($ty:ty) => $field:ident: $store:ty),* $(,)?) => {
        /// A decoded record waiting for its file to finish loading.
        enum Staged {
            $($variant($ty),)*
        }

        impl Staged {
            fn admit(&self) -> Result<Admission> {
                match self {
                    $(Staged::$variant(record) => <$store as RecordStore>::admit(record),)*
                }
            }
        }

        impl Catalogue {
            /// Record kinds the catalogue loads; anything else is skipped.
            pub const SUPPORTED_KINDS: &'static [Tag] = &[$(<$ty as Record>::KIND,)*];

            /// Picks the loader for `kind`; `None` if the kind is not supported.
            fn dispatch(kind: Tag, reader: &mut RecordReader<'_>) -> Option<Result<Option<Staged>>> {
                $(
                    if kind == <$ty as Record>::KIND {
                        return Some(
                            <$ty as Record>::load(reader).map(|record| record.map(Staged::$variant)),
                        );
                    }
                )*
                None
            }

            fn commit_record(&mut self, staged: Staged) {
                match staged {
                    $(Staged::$variant(record) => self.$field.append(record),)*
                }
            }
        }

        $(
            impl StoredIn for $ty {
                type Store = $store;

                fn store(catalogue: &Catalogue) -> &$store {
                    &catalogue.$field
                }
            }
        )*
    };
}

catalogue_kinds! {
    Door(Door) => doors: NamedStore<Door>,
    Book(Book) => books: NamedStore<Book>,
    Creature(Creature) => creatures: NamedStore<Creature>,
    Script(Script) => scripts: NamedStore<Script>,
    Sound(Sound) => sounds: NamedStore<Sound>,
    Static(Static) => statics: NamedStore<Static>,
    Skill(Skill) => skills: IndexedStore<Skill>,
    MagicEffect(MagicEffect) => magic_effects: IndexedStore<MagicEffect>,
    LandTexture(LandTexture) => land_textures: LandTextureStore,
    Land(Land) => lands: GridStore<Land>,
    Cell(Cell) => cells: PartitionedStore<Cell>,
    Pathgrid(Pathgrid) => pathgrids: PartitionedStore<Pathgrid>,
}

impl StoredIn for Attribute {
    type Store = IndexedStore<Attribute>;

    fn store(catalogue: &Catalogue) -> &IndexedStore<Attribute> {
        &catalogue.attributes
    }
}

/// In-memory catalogue of every record in a load order.
#[derive(Debug)]
pub struct Catalogue {
    options: LoadOptions,
    resolver: Resolver,
    files: Vec<FileHeader>,

    doors: NamedStore<Door>,
    books: NamedStore<Book>,
    creatures: NamedStore<Creature>,
    scripts: NamedStore<Script>,
    sounds: NamedStore<Sound>,
    statics: NamedStore<Static>,
    skills: IndexedStore<Skill>,
    magic_effects: IndexedStore<MagicEffect>,
    attributes: IndexedStore<Attribute>,
    land_textures: LandTextureStore,
    lands: GridStore<Land>,
    cells: PartitionedStore<Cell>,
    pathgrids: PartitionedStore<Pathgrid>,

    /// Problems found while loading and collapsing duplicates.
    warnings: Vec<LoadError>,
    /// Dangling references found by the last `set_up`.
    dangling: Vec<LoadError>,
    /// Duplicate that failed a strict `set_up`. The stores have already
    /// collapsed it, so every later `set_up` reports it again.
    rejected: Option<Duplicate>,
    ready: bool,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new(LoadOptions::default())
    }
}

impl Catalogue {
    pub fn new(options: LoadOptions) -> Self {
        Catalogue {
            options,
            resolver: Resolver::new(),
            files: Vec::new(),
            doors: NamedStore::new(),
            books: NamedStore::new(),
            creatures: NamedStore::new(),
            scripts: NamedStore::new(),
            sounds: NamedStore::new(),
            statics: NamedStore::new(),
            skills: IndexedStore::new(),
            magic_effects: IndexedStore::new(),
            attributes: IndexedStore::new(),
            land_textures: LandTextureStore::new(),
            lands: GridStore::new(),
            cells: PartitionedStore::new(),
            pathgrids: PartitionedStore::new(),
            warnings: Vec::new(),
            dangling: Vec::new(),
            rejected: None,
            ready: false,
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn is_supported(kind: Tag) -> bool {
        Self::SUPPORTED_KINDS.contains(&kind)
    }

    /// Reads a plugin from disk and loads it as the next file in load order.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Opening plugin file: {}", path.display());
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path).map_err(|e| LoadError::from(e).in_file(&name))?;
        self.load_bytes(&name, &bytes)
    }

    /// Loads an in-memory plugin under `name` as the next file in load order.
    ///
    /// On error nothing from the file is kept.
    pub fn load_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.load_file(name, bytes).map_err(|e| e.in_file(name))
    }

    fn load_file(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let encoding = self.options.encoding;
        let mut reader = EsmReader::new(bytes);
        let file_header = header::parse(&mut reader, name, encoding)?;
        let context = self.resolver.begin_file(name, &file_header.masters)?;

        let mut batch = Batch::default();
        while let Some(raw) = reader.next_record()? {
            let kind = raw.kind();
            if raw.header.flags.is_ignored() {
                trace!("Skipping ignored {} record at {:#x}", kind, raw.offset);
                batch.ignored += 1;
                continue;
            }

            let form_id = context.resolve(raw.header.form_id);
            batch.defined.push(form_id);
            if !Self::is_supported(kind) {
                trace!("Skipping unsupported {} record {}", kind, form_id);
                batch.unsupported += 1;
                continue;
            }

            let body = raw.body()?;
            let mut sub = RecordReader::new(raw.header, &body, &context, encoding);
            let staged = match Self::dispatch(kind, &mut sub) {
                Some(Ok(Some(staged))) => staged,
                Some(Ok(None)) => {
                    debug!("Dropping {} tombstone {}: nothing keys it", kind, form_id);
                    batch.dropped += 1;
                    continue;
                }
                Some(Err(e @ LoadError::UnknownSubChunk { .. }))
                    if self.options.skip_unknown_records =>
                {
                    warn!("Dropping {} record {} from {}: {}", kind, form_id, name, e);
                    batch.warnings.push(e.in_file(name));
                    batch.dropped += 1;
                    continue;
                }
                Some(Err(e)) => return Err(e),
                None => continue,
            };

            if let Admission::Drop(reason) = staged.admit()? {
                debug!("Dropping {} record {}: {}", kind, form_id, reason);
                batch.dropped += 1;
                continue;
            }

            trace!("Staged {} record {}", kind, form_id);
            batch.references.extend(
                sub.take_references()
                    .into_iter()
                    .map(|target| Reference {
                        from: form_id,
                        kind,
                        target,
                    }),
            );
            batch.staged.push(staged);
        }

        let committed = batch.staged.len();
        self.resolver
            .commit(context, batch.defined, batch.references);
        for staged in batch.staged {
            self.commit_record(staged);
        }
        self.warnings.extend(batch.warnings);
        self.files.push(file_header);
        self.ready = false;

        info!(
            "Loaded {}: {} records committed, {} unsupported, {} ignored, {} dropped",
            name, committed, batch.unsupported, batch.ignored, batch.dropped
        );
        Ok(())
    }

    /// Loads every file in order, collecting failures instead of stopping
    /// (unless `stop_on_first_error` is set).
    pub fn load_all<I, P>(&mut self, paths: I) -> Result<LoadReport>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = LoadReport::default();
        for path in paths {
            let path = path.as_ref();
            match self.load(path) {
                Ok(()) => {
                    if let Some(file) = self.files.last() {
                        report.loaded.push(file.name.clone());
                    }
                }
                Err(e) if self.options.stop_on_first_error => return Err(e),
                Err(e) => {
                    warn!("Failed to load {}: {}", path.display(), e);
                    report.failed.push((path.to_path_buf(), e));
                }
            }
        }
        Ok(report)
    }

    /// Builds every store's indices and checks cross-references.
    ///
    /// Must be called after the last load and before any query.
    pub fn set_up(&mut self) -> Result<()> {
        if let Some(duplicate) = &self.rejected {
            return Err(duplicate.clone().into_error());
        }

        let mut duplicates: Vec<Duplicate> = Vec::new();
        duplicates.extend(self.doors.set_up());
        duplicates.extend(self.books.set_up());
        duplicates.extend(self.creatures.set_up());
        duplicates.extend(self.scripts.set_up());
        duplicates.extend(self.sounds.set_up());
        duplicates.extend(self.statics.set_up());
        duplicates.extend(self.skills.set_up());
        duplicates.extend(self.magic_effects.set_up());
        duplicates.extend(self.land_textures.set_up());
        duplicates.extend(self.lands.set_up());
        duplicates.extend(self.cells.set_up());

        // Pathgrids are classified by the cells they belong to
        let cells = &self.cells;
        for grid in self.pathgrids.records_mut() {
            grid.interior = (grid.x, grid.y) == (0, 0) && cells.search_interior(&grid.cell).is_some();
        }
        duplicates.extend(self.pathgrids.set_up());

        if self.attributes.is_empty() {
            for attribute in Attribute::builtin() {
                self.attributes.append(attribute);
            }
        }
        duplicates.extend(self.attributes.set_up());

        for duplicate in duplicates {
            if self.options.strict_uniqueness {
                self.rejected = Some(duplicate.clone());
                return Err(duplicate.into_error());
            }
            if duplicate.is_override() {
                debug!(
                    "{} '{}' from file {} overridden by file {}",
                    duplicate.kind, duplicate.key, duplicate.replaced_source, duplicate.winner_source
                );
            } else {
                let error = duplicate.into_error();
                warn!("{}", error);
                self.warnings.push(error);
            }
        }

        self.dangling.clear();
        for reference in self.resolver.dangling() {
            let error = LoadError::DanglingReference {
                from: reference.from,
                kind: reference.kind,
                target: reference.target,
            };
            if self.options.strict_references {
                return Err(error);
            }
            warn!("{}", error);
            self.dangling.push(error);
        }

        self.ready = true;
        info!(
            "Catalogue set up: {} files, {} doors, {} books, {} creatures, {} scripts, {} sounds, {} statics, {} cells, {} diagnostics",
            self.files.len(),
            self.doors.len(),
            self.books.len(),
            self.creatures.len(),
            self.scripts.len(),
            self.sounds.len(),
            self.statics.len(),
            self.cells.len(),
            self.warnings.len() + self.dangling.len()
        );
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Typed access to the store of record kind `K`.
    pub fn store<K: StoredIn>(&self) -> &K::Store {
        K::store(self)
    }

    /// Headers of the loaded files, in load order.
    pub fn files(&self) -> &[FileHeader] {
        &self.files
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Non-fatal problems found during loading and set-up.
    pub fn diagnostics(&self) -> impl Iterator<Item = &LoadError> + '_ {
        self.warnings.iter().chain(self.dangling.iter())
    }

    pub fn doors(&self) -> &NamedStore<Door> {
        &self.doors
    }

    pub fn books(&self) -> &NamedStore<Book> {
        &self.books
    }

    pub fn creatures(&self) -> &NamedStore<Creature> {
        &self.creatures
    }

    pub fn scripts(&self) -> &NamedStore<Script> {
        &self.scripts
    }

    pub fn sounds(&self) -> &NamedStore<Sound> {
        &self.sounds
    }

    pub fn statics(&self) -> &NamedStore<Static> {
        &self.statics
    }

    pub fn skills(&self) -> &IndexedStore<Skill> {
        &self.skills
    }

    pub fn magic_effects(&self) -> &IndexedStore<MagicEffect> {
        &self.magic_effects
    }

    pub fn attributes(&self) -> &IndexedStore<Attribute> {
        &self.attributes
    }

    pub fn land_textures(&self) -> &LandTextureStore {
        &self.land_textures
    }

    pub fn lands(&self) -> &GridStore<Land> {
        &self.lands
    }

    pub fn cells(&self) -> &PartitionedStore<Cell> {
        &self.cells
    }

    pub fn pathgrids(&self) -> &PartitionedStore<Pathgrid> {
        &self.pathgrids
    }

    /// Texture used by `land` at texture slot `slot`.
    ///
    /// Slot values are plugin-local and one-based; 0 is the default texture
    /// and yields `None`.
    pub fn land_texture(&self, land: &Land, slot: usize) -> Option<&LandTexture> {
        let value = *land.textures.get(slot)? as usize;
        if value == 0 {
            return None;
        }
        self.land_textures.search(value - 1, land.meta.source as usize)
    }

    /// Pathgrid of `cell`, looked up by name for interiors and grid for exteriors.
    pub fn pathgrid_for(&self, cell: &Cell) -> Option<&Pathgrid> {
        if cell.is_exterior() {
            let grid = cell.grid?;
            self.pathgrids.search_exterior(grid.x, grid.y)
        } else {
            self.pathgrids.search_interior(&cell.editor_id)
        }
    }

    /// Record counts per store, for summaries.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("doors", self.doors.len()),
            ("books", self.books.len()),
            ("creatures", self.creatures.len()),
            ("scripts", self.scripts.len()),
            ("sounds", self.sounds.len()),
            ("statics", self.statics.len()),
            ("skills", self.skills.len()),
            ("magic effects", self.magic_effects.len()),
            ("attributes", self.attributes.len()),
            ("land textures", self.land_textures.len()),
            ("lands", self.lands.len()),
            ("cells", self.cells.len()),
            ("pathgrids", self.pathgrids.len()),
        ]
    }
}
