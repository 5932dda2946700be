//! In-place structural edits over an encoded byte image.
//!
//! Every edit produces a new image equal to the original with one
//! contiguous region replaced, then patches the body-size field of each
//! ancestor by the length delta. Ancestor offsets all lie in the unchanged
//! prefix ahead of the splice point, so they remain valid in the output.

use super::scout::ScoutFrame;

/// Removes the end tag's full byte span (`body_size + 5` bytes).
pub fn delete(data: &[u8], end: &ScoutFrame, ancestors: &[ScoutFrame]) -> Vec<u8> {
    let removed = end.body_size + 5;
    let mut out = Vec::with_capacity(data.len() - removed);
    out.extend_from_slice(&data[..end.start_index - 1]);
    out.extend_from_slice(&data[end.start_index + 4 + end.body_size..]);
    patch_ancestors(&mut out, ancestors, -(removed as i64));
    out
}

/// Replaces the end tag's byte span with `new_tag` verbatim.
pub fn replace(data: &[u8], end: &ScoutFrame, ancestors: &[ScoutFrame], new_tag: &[u8]) -> Vec<u8> {
    let removed = end.body_size + 5;
    let delta = new_tag.len() as i64 - removed as i64;
    let mut out = Vec::with_capacity((data.len() as i64 + delta) as usize);
    out.extend_from_slice(&data[..end.start_index - 1]);
    out.extend_from_slice(new_tag);
    out.extend_from_slice(&data[end.start_index + 4 + end.body_size..]);
    patch_ancestors(&mut out, ancestors, delta);
    out
}

/// Splices `new_bytes` at the end of the last ancestor's value region and
/// grows every ancestor, the last one included. With no ancestors the bytes
/// are appended at the top level of the image.
pub fn insert(data: &[u8], ancestors: &[ScoutFrame], new_bytes: &[u8]) -> Vec<u8> {
    let point = match ancestors.last() {
        Some(parent) => parent.start_index + 4 + parent.body_size,
        None => data.len(),
    };
    let mut out = Vec::with_capacity(data.len() + new_bytes.len());
    out.extend_from_slice(&data[..point]);
    out.extend_from_slice(new_bytes);
    out.extend_from_slice(&data[point..]);
    patch_ancestors(&mut out, ancestors, new_bytes.len() as i64);
    out
}

fn patch_ancestors(out: &mut [u8], ancestors: &[ScoutFrame], delta: i64) {
    for frame in ancestors {
        let patched = (frame.body_size as i64 + delta) as i32;
        out[frame.start_index..frame.start_index + 4].copy_from_slice(&patched.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_tags, encode_tag, encode_tags};
    use crate::image::{navigate, scout::scout};
    use crate::registry::Registry;
    use crate::tag::Tag;
    use bytes::BytesMut;

    fn car_image() -> Vec<u8> {
        let owner = Tag::object(
            "Owner",
            vec![
                Tag::new("firstName", "Jeff"),
                Tag::new("lastName", "Bob"),
                Tag::new("Age", 30i32),
            ],
        );
        let car = Tag::object(
            "Car",
            vec![Tag::new("type", "Jeep"), Tag::new("gas", 30i32), owner],
        );
        let mut buf = BytesMut::new();
        encode_tags(&mut buf, &[car], &Registry::default()).unwrap();
        buf.to_vec()
    }

    fn body_size_of(data: &[u8], key: &str) -> usize {
        let trail = scout(data, key).unwrap();
        trail.end.unwrap().body_size
    }

    fn encode_one(tag: &Tag) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_tag(&mut buf, tag, &Registry::default()).unwrap();
        buf.to_vec()
    }

    #[test]
    fn delete_removes_span_and_shrinks_ancestors() {
        let data = car_image();
        let registry = Registry::default();
        let car_before = body_size_of(&data, "Car");

        let trail = scout(&data, "Car.gas").unwrap();
        let end = trail.end.as_ref().unwrap();
        let removed = end.body_size + 5; // IntTag("gas", 30) = 12 bytes total
        assert_eq!(removed, 12);

        let out = delete(&data, end, &trail.ancestors);
        assert_eq!(out.len(), data.len() - removed);
        assert!(!navigate::find(&out, "Car.gas").unwrap());
        // Untouched siblings survive.
        let first = navigate::get(&out, "Car.Owner.firstName", &registry).unwrap().unwrap();
        assert_eq!(first.value.as_str(), Some("Jeff"));
        assert_eq!(body_size_of(&out, "Car"), car_before - removed);
        // The whole image still decodes.
        decode_tags(&out, &registry).unwrap();
    }

    #[test]
    fn replace_with_larger_tag_grows_ancestors_by_the_delta() {
        let data = car_image();
        let registry = Registry::default();
        let car_before = body_size_of(&data, "Car");
        let owner_before = body_size_of(&data, "Car.Owner");

        let trail = scout(&data, "Car.Owner.firstName").unwrap();
        let end = trail.end.as_ref().unwrap();
        let new_tag = encode_one(&Tag::new("firstName", "Jeffrey"));
        let delta = new_tag.len() as i64 - (end.body_size + 5) as i64;
        assert_eq!(delta, 3); // "Jeffrey" is 3 bytes longer than "Jeff"

        let out = replace(&data, end, &trail.ancestors, &new_tag);
        let first = navigate::get(&out, "Car.Owner.firstName", &registry).unwrap().unwrap();
        assert_eq!(first.value.as_str(), Some("Jeffrey"));
        assert_eq!(body_size_of(&out, "Car"), car_before + 3);
        assert_eq!(body_size_of(&out, "Car.Owner"), owner_before + 3);
        decode_tags(&out, &registry).unwrap();
    }

    #[test]
    fn replace_with_smaller_tag_shrinks_ancestors() {
        let data = car_image();
        let owner_before = body_size_of(&data, "Car.Owner");

        let trail = scout(&data, "Car.Owner.firstName").unwrap();
        let end = trail.end.as_ref().unwrap();
        let new_tag = encode_one(&Tag::new("firstName", "Jo"));

        let out = replace(&data, end, &trail.ancestors, &new_tag);
        assert_eq!(body_size_of(&out, "Car.Owner"), owner_before - 2);
        let first = navigate::get(&out, "Car.Owner.firstName", &Registry::default())
            .unwrap()
            .unwrap();
        assert_eq!(first.value.as_str(), Some("Jo"));
    }

    #[test]
    fn insert_splices_after_the_parent_value_region() {
        let data = car_image();
        let registry = Registry::default();
        let car_before = body_size_of(&data, "Car");
        let owner_before = body_size_of(&data, "Car.Owner");

        // Scouting a missing child of Owner leaves Owner as the last ancestor.
        let trail = scout(&data, "Car.Owner.nickname").unwrap();
        assert!(trail.end.is_none());
        let new_tag = encode_one(&Tag::new("nickname", "JB"));

        let out = insert(&data, &trail.ancestors, &new_tag);
        assert_eq!(out.len(), data.len() + new_tag.len());
        let nick = navigate::get(&out, "Car.Owner.nickname", &registry).unwrap().unwrap();
        assert_eq!(nick.value.as_str(), Some("JB"));
        assert_eq!(body_size_of(&out, "Car"), car_before + new_tag.len());
        assert_eq!(body_size_of(&out, "Car.Owner"), owner_before + new_tag.len());
        decode_tags(&out, &registry).unwrap();
    }

    #[test]
    fn insert_without_ancestors_appends_at_top_level() {
        let data = car_image();
        let new_tag = encode_one(&Tag::new("extra", 7i32));
        let out = insert(&data, &[], &new_tag);
        assert!(navigate::find(&out, "extra").unwrap());
        assert!(navigate::find(&out, "Car.Owner.Age").unwrap());
    }

    #[test]
    fn delete_then_reinsert_restores_the_image() {
        let data = car_image();
        // "Owner" is the last child of Car, so deleting and re-inserting it
        // lands on the same offset and restores the exact bytes.
        let trail = scout(&data, "Car.Owner").unwrap();
        let end = trail.end.as_ref().unwrap();
        let owner_bytes =
            data[end.start_index - 1..end.start_index + 4 + end.body_size].to_vec();

        let without = delete(&data, end, &trail.ancestors);
        let trail2 = scout(&without, "Car.Owner.anything").unwrap();
        assert!(trail2.end.is_none());
        let restored = insert(&without, &trail2.ancestors, &owner_bytes);
        assert_eq!(restored, data);
    }
}
