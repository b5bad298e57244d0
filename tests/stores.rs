use esm_catalogue::esm::records::{Attribute, Cell, CellGrid, Door, Land, LandTexture, RecordMeta};
use esm_catalogue::esm::store::{
    GridStore, IndexedStore, LandTextureStore, NamedStore, PartitionedStore, RecordStore,
    Spatial,
};
use esm_catalogue::{FormId, LoadError, RecordFlags};

fn meta(object: u32, source: u8, flags: u32) -> RecordMeta {
    RecordMeta {
        form_id: FormId::new(source, object),
        flags: RecordFlags(flags),
        source,
    }
}

fn door(editor_id: &str, full_name: &str, source: u8) -> Door {
    Door {
        meta: meta(1, source, 0),
        editor_id: editor_id.to_string(),
        full_name: full_name.to_string(),
        model: String::new(),
        script: None,
        open_sound: None,
        close_sound: None,
        loop_sound: None,
        data: None,
        door_flags: 0,
    }
}

fn cell(editor_id: &str, grid: Option<(i32, i32)>, source: u8) -> Cell {
    Cell {
        meta: meta(2, source, 0),
        editor_id: editor_id.to_string(),
        full_name: String::new(),
        flags: if grid.is_some() { 0 } else { Cell::INTERIOR },
        grid: grid.map(|(x, y)| CellGrid { x, y, land_flags: None }),
        water_height: None,
        regions: Vec::new(),
        climate: None,
        water: None,
        owner: None,
    }
}

fn land(x: i32, y: i32, source: u8) -> Land {
    Land {
        meta: meta(3, source, 0),
        x,
        y,
        flags: 0,
        heights: None,
        textures: Vec::new(),
    }
}

fn land_texture(editor_id: &str, index: u32, texture: &str, source: u8) -> LandTexture {
    LandTexture {
        meta: meta(4, source, 0),
        editor_id: editor_id.to_string(),
        index,
        texture: texture.to_string(),
    }
}

#[test]
fn named_lookup_ignores_case() {
    let mut store = NamedStore::new();
    store.append(door("DoorA", "Iron Door", 0));
    store.append(door("Gate_01", "Gate", 0));
    assert!(store.set_up().is_empty());

    let exact = store.search("DoorA").expect("exact case");
    let lower = store.search("doora").expect("lower case");
    let upper = store.search("DOORA").expect("upper case");
    assert!(std::ptr::eq(exact, lower));
    assert!(std::ptr::eq(exact, upper));
    assert_eq!(exact.editor_id, "DoorA", "original case is kept for display");
    assert_eq!(store.list_identifiers(), ["doora", "gate_01"]);
}

#[test]
fn named_find_reports_the_missing_key() {
    let mut store: NamedStore<Door> = NamedStore::new();
    store.set_up();

    match store.find("NoSuchDoor") {
        Err(LoadError::LookupMiss { kind, key }) => {
            assert_eq!(kind, "Door");
            assert_eq!(key, "NoSuchDoor");
        }
        other => panic!("expected LookupMiss, got {:?}", other),
    }
}

#[test]
fn later_registration_wins_and_is_reported() {
    let mut store = NamedStore::new();
    store.append(door("DoorA", "Iron Door", 0));
    store.append(door("Chest", "Chest", 0));
    store.append(door("DOORA", "Steel Door", 1));

    let duplicates = store.set_up();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].key, "doora");
    assert!(duplicates[0].is_override());

    assert_eq!(store.len(), 2);
    assert_eq!(store.find("doora").unwrap().full_name, "Steel Door");
}

#[test]
fn load_order_follows_first_definition() {
    let mut store = NamedStore::new();
    store.append(door("Zeta", "Z", 0));
    store.append(door("Alpha", "A", 0));
    store.append(door("Mid", "M", 0));
    store.append(door("zeta", "Z2", 1));
    store.set_up();

    let sorted: Vec<&str> = store.iter().map(|d| d.editor_id.as_str()).collect();
    assert_eq!(sorted, ["Alpha", "Mid", "zeta"]);
    let loaded: Vec<&str> = store.iter_load_order().map(|d| d.full_name.as_str()).collect();
    assert_eq!(loaded, ["Z2", "A", "M"]);
}

#[test]
fn deleted_winner_removes_the_key() {
    let mut store = NamedStore::new();
    store.append(door("DoorA", "Iron Door", 0));
    let mut tombstone = door("DoorA", "", 1);
    tombstone.meta.flags = RecordFlags(RecordFlags::DELETED);
    store.append(tombstone);
    store.append(door("DoorB", "Oak Door", 0));
    store.set_up();

    assert!(store.search("DoorA").is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn prefix_search_is_case_insensitive() {
    let mut store = NamedStore::new();
    for id in ["ex_door_01", "EX_Door_02", "ex_gate", "in_door"] {
        store.append(door(id, id, 0));
    }
    store.set_up();

    let found: Vec<&str> = store.search_prefix("Ex_Door").map(|d| d.editor_id.as_str()).collect();
    assert_eq!(found, ["ex_door_01", "EX_Door_02"]);
    assert_eq!(store.search_prefix("zz").count(), 0);
}

#[test]
fn grid_lookup_handles_negative_coordinates() {
    let mut store = GridStore::new();
    for (x, y) in [(0, 0), (-3, 4), (2, -7), (-3, -4), (1, 1)] {
        store.append(land(x, y, 0));
    }
    store.set_up();

    for (x, y) in [(0, 0), (-3, 4), (2, -7), (-3, -4), (1, 1)] {
        let found = store.search(x, y).expect("present");
        assert_eq!((found.x, found.y), (x, y));
    }
    assert!(store.search(-4, 3).is_none());
    assert!(store.find(9, 9).is_err());

    let order: Vec<(i32, i32)> = store.iter().map(|l| (l.x, l.y)).collect();
    assert_eq!(order, [(-3, -4), (-3, 4), (0, 0), (1, 1), (2, -7)]);
}

#[test]
fn grid_collapses_to_the_last_plugin() {
    let mut store = GridStore::new();
    store.append(land(5, 5, 0));
    store.append(land(5, 5, 2));
    store.append(land(5, 5, 1));
    let duplicates = store.set_up();

    assert_eq!(duplicates.len(), 2);
    assert_eq!(store.len(), 1);
    assert_eq!(store.search(5, 5).unwrap().meta.source, 1, "last appended wins");
}

#[test]
fn partition_keeps_each_side_sorted() {
    let mut store = PartitionedStore::new();
    store.append(cell("Wilderness", Some((3, -1)), 0));
    store.append(cell("Vivec, Arena", None, 0));
    store.append(cell("Wilderness", Some((-2, 5)), 0));
    store.append(cell("balmora, guild", None, 0));
    store.append(cell("Wilderness", Some((-2, -7)), 0));
    store.append(cell("Ald-ruhn", None, 0));
    store.set_up();

    assert_eq!(store.interior_len(), 3);
    assert_eq!(store.exterior_len(), 3);
    assert!(store.interiors().iter().all(|c| c.is_interior()));
    assert!(store.exteriors().iter().all(|c| !c.is_interior()));

    let names: Vec<&str> = store.interiors().iter().map(|c| c.editor_id.as_str()).collect();
    assert_eq!(names, ["Ald-ruhn", "balmora, guild", "Vivec, Arena"]);
    let grids: Vec<(i32, i32)> = store.exteriors().iter().map(|c| c.grid()).collect();
    assert_eq!(grids, [(-2, -7), (-2, 5), (3, -1)]);

    assert!(store.search_interior("BALMORA, GUILD").is_some());
    assert!(store.search_exterior(-2, -7).is_some());
    assert!(store.search_interior("Wilderness").is_none());
    assert!(store.find_exterior(0, 0).is_err());
}

#[test]
fn exterior_search_by_name_prefers_the_north_east() {
    let mut store = PartitionedStore::new();
    store.append(cell("Ascadian Isles", Some((5, -6)), 0));
    store.append(cell("Ascadian Isles", Some((6, -9)), 0));
    store.append(cell("Ascadian Isles", Some((6, -7)), 0));
    store.append(cell("Bitter Coast", Some((-9, 1)), 0));
    store.set_up();

    let cell = store.search_exterior_by_name("ascadian isles").unwrap();
    assert_eq!(cell.grid(), (6, -7));
    assert!(store.search_exterior_by_name("Grazelands").is_none());
}

#[test]
fn partition_collapses_within_its_own_range() {
    let mut store = PartitionedStore::new();
    store.append(cell("Guild", None, 0));
    store.append(cell("Field", Some((0, 0)), 0));
    store.append(cell("guild", None, 1));
    store.append(cell("Field Patched", Some((0, 0)), 1));
    let duplicates = store.set_up();

    assert_eq!(duplicates.len(), 2);
    assert_eq!(store.len(), 2);
    assert_eq!(store.search_interior("Guild").unwrap().meta.source, 1);
    assert_eq!(store.search_exterior(0, 0).unwrap().editor_id, "Field Patched");
}

#[test]
fn attributes_fill_their_fixed_table() {
    let mut store = IndexedStore::new();
    for attribute in Attribute::builtin() {
        store.append(attribute);
    }
    store.set_up();

    assert_eq!(store.len(), Attribute::LENGTH);
    assert_eq!(store.capacity(), 8);
    assert_eq!(store.find(Attribute::LUCK).unwrap().name_setting, "sAttributeLuck");
    assert!(store.search(8).is_none());
    assert!(store.find(8).is_err());
}

#[test]
fn land_textures_are_plugin_local() {
    let mut store = LandTextureStore::new();
    store.append(land_texture("Grass", 0, "grass.dds", 0));
    store.append(land_texture("Rock", 1, "rock.dds", 0));
    store.append(land_texture("Sand", 0, "sand.dds", 1));
    store.set_up();

    assert_eq!(store.search(0, 0).unwrap().texture, "grass.dds");
    assert_eq!(store.search(0, 1).unwrap().texture, "sand.dds");
    assert!(store.search(1, 1).is_none());
    assert!(store.search(0, 5).is_none());
    assert_eq!(store.len(), 3);
}

#[test]
fn same_named_land_texture_replaces_earlier_paths() {
    let mut store = LandTextureStore::new();
    store.append(land_texture("Grass", 0, "grass.dds", 0));
    store.append(land_texture("GRASS", 0, "grass_hd.dds", 1));
    store.set_up();

    assert_eq!(store.search(0, 0).unwrap().texture, "grass_hd.dds");
    assert_eq!(store.search(0, 1).unwrap().texture, "grass_hd.dds");
}

#[test]
fn sparse_index_past_its_limit_is_rejected() {
    let texture = land_texture("Huge", 0x1_0000, "huge.dds", 0);
    let err = LandTextureStore::admit(&texture).unwrap_err();
    assert!(matches!(err, LoadError::IndexOutOfRange { .. }), "unexpected error {:?}", err);
}

#[test]
fn exterior_search_by_region_prefers_the_north_east() {
    let ascadian = FormId::new(0, 0x40);
    let coast = FormId::new(0, 0x41);
    let in_region = |grid, regions: &[FormId]| {
        let mut c = cell("", Some(grid), 0);
        c.regions = regions.to_vec();
        c
    };

    let mut store = PartitionedStore::new();
    store.append(in_region((5, -6), &[ascadian]));
    store.append(in_region((6, -9), &[ascadian]));
    store.append(in_region((6, -7), &[coast, ascadian]));
    store.append(in_region((9, 9), &[coast]));
    store.append(cell("Tower", None, 0));
    store.set_up();

    assert_eq!(store.search_exterior_by_region(ascadian).unwrap().grid(), (6, -7));
    assert_eq!(store.search_exterior_by_region(coast).unwrap().grid(), (9, 9));
    assert!(store.search_exterior_by_region(FormId::new(0, 0x99)).is_none());
}
