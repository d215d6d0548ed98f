use super::{
    dict_types, ObjectId, K_CONTENTS, K_COUNT, K_FONT, K_KIDS, K_MEDIA_BOX, K_PARENT, K_RESOURCES, K_TYPE,
    K_XOBJECT,
};
use crate::pdf::{Array, Dictionary, Name};

/// Page tree node holding every page directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageTree {
    pub kids: Vec<ObjectId>,
}

impl From<&PageTree> for Dictionary {
    fn from(tree: &PageTree) -> Self {
        let kids: Array = tree.kids.iter().copied().collect();
        Dictionary::new()
            .with(K_TYPE, Name::from(dict_types::PAGES))
            .with(K_KIDS, kids)
            .with(K_COUNT, tree.kids.len())
    }
}

/// Named resources a content stream may use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resources {
    pub fonts: Vec<(Name, ObjectId)>,
    pub x_objects: Vec<(Name, ObjectId)>,
}

impl Resources {
    pub fn with_font(mut self, name: impl Into<Name>, id: ObjectId) -> Self {
        self.fonts.push((name.into(), id));
        self
    }

    pub fn with_x_object(mut self, name: impl Into<Name>, id: ObjectId) -> Self {
        self.x_objects.push((name.into(), id));
        self
    }
}

fn name_map(entries: &[(Name, ObjectId)]) -> Dictionary {
    entries.iter().map(|(name, id)| (name.clone(), *id)).collect()
}

impl From<&Resources> for Dictionary {
    fn from(res: &Resources) -> Self {
        let mut dict = Dictionary::new().with(K_FONT, name_map(&res.fonts));
        if !res.x_objects.is_empty() {
            dict.insert(K_XOBJECT, name_map(&res.x_objects));
        }
        dict
    }
}

/// A leaf page with a single content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub parent: ObjectId,
    /// `[llx lly urx ury]` in points.
    pub media_box: [i64; 4],
    pub resources: Resources,
    pub contents: ObjectId,
}

impl From<&Page> for Dictionary {
    fn from(page: &Page) -> Self {
        Dictionary::new()
            .with(K_TYPE, Name::from(dict_types::PAGE))
            .with(K_PARENT, page.parent)
            .with(K_MEDIA_BOX, Array::rectangle(page.media_box))
            .with(K_RESOURCES, Dictionary::from(&page.resources))
            .with(K_CONTENTS, page.contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::Object;

    #[test]
    fn resources_without_image_have_no_xobject() {
        let res = Resources::default().with_font("F1", ObjectId(3));
        let dict = Dictionary::from(&res);
        assert!(dict.contains_key(K_FONT));
        assert!(!dict.contains_key(K_XOBJECT));
        let fonts = dict.get(K_FONT).and_then(Object::dictionary).unwrap();
        assert_eq!(fonts.get(b"F1"), Some(&Object::from(ObjectId(3))));
    }

    #[test]
    fn page_tree_counts_kids() {
        let tree = PageTree {
            kids: vec![ObjectId(6)],
        };
        let dict = Dictionary::from(&tree);
        assert_eq!(dict.get(K_COUNT), Some(&Object::Integer(1)));
        assert_eq!(dict.get(K_KIDS), Some(&Object::from(vec![Object::from(ObjectId(6))])));
    }
}
