//! Page tree manipulation and cross-document page copying.
//!
//! A page copied out of a source document takes the objects it uses with it
//! (content streams, resources, fonts, images, annotations), renumbered into
//! the target's id space. The `/Parent` link is cut and re-pointed at the
//! target's page tree, and attributes the page inherited from ancestor
//! `Pages` nodes are written onto the copy.
//!
//! References to other pages or page tree nodes are never followed: they
//! resolve to pages already imported from the same source, or to `null`.

use anyhow::{Context, anyhow, bail};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeMap;

/// Page attributes that may be inherited from ancestor `Pages` nodes.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Source → target object ids for one (source, target) document pair.
///
/// Reusing the map across imports keeps objects shared between pages of
/// the source (fonts, images, form XObjects) shared in the target.
pub type IdMap = BTreeMap<ObjectId, ObjectId>;

/// Build an empty document with a catalog and an empty page tree.
pub fn empty_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    };
    doc.objects.insert(pages_id, pages.into());

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Id of the root `Pages` node of a document.
pub fn page_tree_root(doc: &Document) -> anyhow::Result<ObjectId> {
    doc.catalog()
        .context("Failed to get catalog")?
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .context("Failed to get pages reference")
}

/// Copy `page_id` from `source` into `target` and insert it into the
/// target's root page tree at `at` (clamped to the current page count).
///
/// `id_map` must be the same map for every page imported from `source`
/// into `target`. The page itself always gets a fresh id, so importing the
/// same page twice yields two pages.
///
/// Returns the page's id in the target document.
pub fn import_page(
    target: &mut Document,
    source: &Document,
    page_id: ObjectId,
    at: usize,
    id_map: &mut IdMap,
) -> anyhow::Result<ObjectId> {
    let pages_id = page_tree_root(target)?;

    let mut page = source
        .get_dictionary(page_id)
        .context("Page object is not a dictionary")?
        .clone();
    inherit_attributes(source, &mut page);
    page.remove(b"Parent");

    let new_id = target.new_object_id();
    id_map.insert(page_id, new_id);

    let mut copied = import_dictionary(target, source, &page, id_map);
    copied.set("Parent", pages_id);
    target.objects.insert(new_id, Object::Dictionary(copied));

    insert_into_page_tree(target, pages_id, new_id, at)?;

    Ok(new_id)
}

/// Fill in attributes the page inherits from its ancestors.
fn inherit_attributes(source: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(|p| p.as_reference()).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }

        let Ok(node) = source.get_dictionary(node_id) else {
            break;
        };

        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }

        parent = node.get(b"Parent").and_then(|p| p.as_reference()).ok();
    }
}

/// Deep-copy an object from `source`, allocating fresh ids in `target` for
/// every reference reached. `id_map` records source → target ids so shared
/// objects are copied once.
fn import_object(
    target: &mut Document,
    source: &Document,
    object: &Object,
    id_map: &mut IdMap,
) -> Object {
    match object {
        Object::Reference(id) => {
            if let Some(mapped) = id_map.get(id) {
                return Object::Reference(*mapped);
            }

            let referenced = match source.get_object(*id) {
                Ok(referenced) => referenced,
                Err(_) => return Object::Null,
            };
            // Pages not imported (yet) stay behind, along with everything
            // only they use.
            if is_page_tree_node(referenced) {
                return Object::Null;
            }

            let new_id = target.new_object_id();
            id_map.insert(*id, new_id);

            let copied = import_object(target, source, referenced, id_map);
            target.objects.insert(new_id, copied);

            Object::Reference(new_id)
        }
        Object::Array(items) => {
            let mut copied = Vec::with_capacity(items.len());
            for item in items {
                copied.push(import_object(target, source, item, id_map));
            }
            Object::Array(copied)
        }
        Object::Dictionary(dict) => {
            Object::Dictionary(import_dictionary(target, source, dict, id_map))
        }
        Object::Stream(stream) => {
            let mut copied = stream.clone();
            copied.dict = import_dictionary(target, source, &stream.dict, id_map);
            Object::Stream(copied)
        }
        other => other.clone(),
    }
}

fn import_dictionary(
    target: &mut Document,
    source: &Document,
    dict: &Dictionary,
    id_map: &mut IdMap,
) -> Dictionary {
    let mut copied = Dictionary::new();
    for (key, value) in dict.iter() {
        let value = import_object(target, source, value, id_map);
        copied.set(key.clone(), value);
    }
    copied
}

fn is_page_tree_node(object: &Object) -> bool {
    let Object::Dictionary(dict) = object else {
        return false;
    };
    matches!(dict.get(b"Type"), Ok(Object::Name(name)) if name == b"Page" || name == b"Pages")
}

/// Insert a page reference into a `Pages` node and bump its count.
fn insert_into_page_tree(
    doc: &mut Document,
    pages_id: ObjectId,
    page_id: ObjectId,
    at: usize,
) -> anyhow::Result<()> {
    let pages = doc
        .get_object_mut(pages_id)
        .context("Failed to get pages object")?;

    let Object::Dictionary(dict) = pages else {
        bail!("Pages object is not a dictionary");
    };

    let kids = dict
        .get_mut(b"Kids")
        .map_err(|_| anyhow!("Pages dictionary missing Kids array"))?;

    let Object::Array(kids) = kids else {
        bail!("Kids is not an array");
    };

    let at = at.min(kids.len());
    kids.insert(at, Object::Reference(page_id));

    let current_count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(current_count + 1));

    Ok(())
}
