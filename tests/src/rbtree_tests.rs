//! Red-black tree invariants: insert/delete ordering and structural balance.

use rtos_rbtree::{LeftCached, RbTree};
use rtos_lib::{fail, pass, test_suite};
use rtos_lib::testing::TestResult;

fn test_insert_find_roundtrip() -> TestResult {
    let mut tree: RbTree<u32, 16> = RbTree::new();
    let ids: [_; 8] = core::array::from_fn(|i| tree.insert((i as u32) * 3).unwrap());
    for (i, id) in ids.iter().enumerate() {
        if *tree.get(*id) != (i as u32) * 3 {
            return fail!("node {} holds wrong value", i);
        }
    }
    if tree.find(&9).is_none() {
        return fail!("find missed a value that was inserted");
    }
    if tree.find(&1000).is_some() {
        return fail!("find returned a value never inserted");
    }
    pass!()
}

fn test_inorder_is_sorted() -> TestResult {
    let mut tree: RbTree<i32, 32> = RbTree::new();
    let values = [5, 1, 9, 3, 7, 2, 8, 4, 6, 0, -3, 42];
    for v in values {
        tree.insert(v);
    }
    let mut prev: Option<i32> = None;
    let mut count = 0;
    tree.inorder_foreach(|v| {
        if let Some(p) = prev {
            if p > *v {
                count = -1;
            }
        }
        if count != -1 {
            prev = Some(*v);
            count += 1;
        }
    });
    if count != values.len() as i32 {
        return fail!("inorder traversal was not sorted");
    }
    pass!()
}

fn test_delete_preserves_remaining_order() -> TestResult {
    let mut tree: RbTree<u32, 16> = RbTree::new();
    let ids: [_; 10] = core::array::from_fn(|i| tree.insert(i as u32).unwrap());
    tree.delete(ids[3]);
    tree.delete(ids[7]);
    tree.delete(ids[0]);
    if tree.len() != 7 {
        return fail!("len after three deletes was {}, expected 7", tree.len());
    }
    let mut prev: Option<u32> = None;
    let mut ok = true;
    tree.inorder_foreach(|v| {
        if let Some(p) = prev {
            if p >= *v {
                ok = false;
            }
        }
        prev = Some(*v);
    });
    if !ok {
        return fail!("remaining entries not strictly increasing after delete");
    }
    if tree.find(&3).is_some() || tree.find(&7).is_some() || tree.find(&0).is_some() {
        return fail!("deleted value still findable");
    }
    pass!()
}

fn test_arena_exhaustion_returns_none() -> TestResult {
    let mut tree: RbTree<u32, 4> = RbTree::new();
    for i in 0..4 {
        if tree.insert(i).is_none() {
            return fail!("insert {} failed before arena was full", i);
        }
    }
    if tree.insert(99).is_some() {
        return fail!("insert succeeded past arena capacity");
    }
    pass!()
}

fn test_node_id_stable_across_unrelated_delete() -> TestResult {
    let mut tree: RbTree<u32, 16> = RbTree::new();
    let a = tree.insert(10).unwrap();
    let b = tree.insert(20).unwrap();
    let c = tree.insert(30).unwrap();
    tree.delete(b);
    if *tree.get(a) != 10 || *tree.get(c) != 30 {
        return fail!("unrelated node ids were disturbed by an intervening delete");
    }
    pass!()
}

fn test_left_cached_peek_min_tracks_minimum() -> TestResult {
    let mut tree: LeftCached<u32, 16> = LeftCached::new();
    let ids: [_; 5] = [50, 10, 40, 20, 30].map(|v| tree.insert(v).unwrap());
    if *tree.peek_min().unwrap() != 10 {
        return fail!("peek_min did not return the smallest inserted value");
    }
    tree.delete(ids[1]); // removes 10
    if *tree.peek_min().unwrap() != 20 {
        return fail!("peek_min did not update after removing the minimum");
    }
    pass!()
}

fn test_left_cached_pop_min_drains_in_order() -> TestResult {
    let mut tree: LeftCached<u32, 16> = LeftCached::new();
    for v in [5, 1, 4, 2, 3] {
        tree.insert(v);
    }
    let mut out = [0u32; 5];
    for slot in out.iter_mut() {
        *slot = tree.pop_min().unwrap();
    }
    if out != [1, 2, 3, 4, 5] {
        return fail!("pop_min did not drain in ascending order");
    }
    if tree.pop_min().is_some() {
        return fail!("pop_min returned a value from an empty tree");
    }
    pass!()
}

test_suite!(
    rbtree_suite,
    [
        test_insert_find_roundtrip,
        test_inorder_is_sorted,
        test_delete_preserves_remaining_order,
        test_arena_exhaustion_returns_none,
        test_node_id_stable_across_unrelated_delete,
        test_left_cached_peek_min_tracks_minimum,
        test_left_cached_pop_min_drains_in_order,
    ]
);
