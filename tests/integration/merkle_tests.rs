// tests/integration/merkle_tests.rs
use merkle_vault::{combine, hash_bytes, verify_proof, Digest, MerkleError, MerkleTree, Proof};

use crate::common::{digests, flip_nibble};

#[test]
fn test_root_is_deterministic() {
    let leaves = digests(11);
    let first = MerkleTree::from_leaves(leaves.clone());
    let second = MerkleTree::from_leaves(leaves);
    assert_eq!(first.root_digest().unwrap(), second.root_digest().unwrap());
}

#[test]
fn test_root_is_pinned() {
    // Any change to the hashing or pairing rules changes this value.
    let a = hash_bytes(b"a");
    let b = hash_bytes(b"b");
    let tree = MerkleTree::from_leaves(vec![a.clone(), b.clone()]);
    let (low, high) = if a < b { (&a, &b) } else { (&b, &a) };
    assert_eq!(
        tree.root_digest().unwrap(),
        &hash_bytes(format!("{}{}", low, high).as_bytes())
    );
}

#[test]
fn test_single_leaf_identity() {
    let leaf = hash_bytes(b"only file");
    let tree = MerkleTree::from_leaves(vec![leaf.clone()]);
    assert_eq!(tree.root_digest().unwrap(), &leaf);
}

#[test]
fn test_round_trip() {
    for n in [1, 2, 3, 4, 5, 8, 13, 32, 33] {
        let leaves = digests(n);
        let tree = MerkleTree::from_leaves(leaves.clone());
        let root = tree.root_digest().unwrap();
        for leaf in &leaves {
            let proof = tree.generate_proof(leaf).unwrap();
            assert!(verify_proof(leaf, &proof, root), "n = {}", n);
        }
    }
}

#[test]
fn test_tamper_sensitivity() {
    let leaves = digests(6);
    let tree = MerkleTree::from_leaves(leaves.clone());
    let root = tree.root_digest().unwrap().clone();
    let leaf = &leaves[3];
    let proof = tree.generate_proof(leaf).unwrap();
    assert!(verify_proof(leaf, &proof, &root));

    for position in [0, 17, 63] {
        assert!(!verify_proof(&flip_nibble(leaf, position), &proof, &root));
        assert!(!verify_proof(leaf, &proof, &flip_nibble(&root, position)));

        for step in 0..proof.len() {
            let mut siblings = proof.siblings().to_vec();
            siblings[step] = flip_nibble(&siblings[step], position);
            assert!(!verify_proof(leaf, &Proof::new(siblings), &root));
        }
    }

    // Reordered, truncated and extended proofs fail as well.
    let mut reversed = proof.siblings().to_vec();
    reversed.reverse();
    assert!(!verify_proof(leaf, &Proof::new(reversed), &root));
    let truncated = proof.siblings()[..proof.len() - 1].to_vec();
    assert!(!verify_proof(leaf, &Proof::new(truncated), &root));
    let mut extended = proof.siblings().to_vec();
    extended.push(leaves[0].clone());
    assert!(!verify_proof(leaf, &Proof::new(extended), &root));
}

#[test]
fn test_corrupted_hex_never_parses() {
    let root = hash_bytes(b"root");
    let mut bytes = root.as_str().as_bytes().to_vec();
    // 'a'..'f' with bit 5 cleared become uppercase, digits become symbols.
    bytes[0] ^= 0x20;
    let text = String::from_utf8(bytes).unwrap();
    assert!(matches!(Digest::parse(&text), Err(MerkleError::HashInput(_))));
}

#[test]
fn test_odd_count_self_pairing() {
    let leaves = digests(3);
    let (a, b, c) = (&leaves[0], &leaves[1], &leaves[2]);
    let tree = MerkleTree::from_leaves(leaves.clone());
    let expected = combine(&combine(a, b), &combine(c, c));
    assert_eq!(tree.root_digest().unwrap(), &expected);
}

#[test]
fn test_rebuild_equivalence() {
    let leaves = digests(3);
    let mut grown = MerkleTree::new();
    for leaf in &leaves {
        grown.add_leaf(leaf.clone());
    }
    let built = MerkleTree::from_leaves(leaves);
    assert_eq!(grown.root_digest().unwrap(), built.root_digest().unwrap());
}

#[test]
fn test_not_found_is_distinct_from_empty_proof() {
    let present = hash_bytes(b"present");
    let tree = MerkleTree::from_leaves(vec![present.clone()]);

    let proof = tree.generate_proof(&present).unwrap();
    assert!(proof.is_empty());

    let absent = hash_bytes(b"absent");
    assert_eq!(
        tree.generate_proof(&absent),
        Err(MerkleError::LeafNotFound(absent.clone()))
    );
    assert_eq!(
        MerkleTree::new().generate_proof(&absent),
        Err(MerkleError::EmptyTree)
    );
}

#[test]
fn test_two_leaf_example() {
    let h1 = hash_bytes(b"h1");
    let h2 = hash_bytes(b"h2");
    let tree = MerkleTree::from_leaves(vec![h1.clone(), h2.clone()]);
    let root = tree.root_digest().unwrap().clone();
    let (low, high) = if h1 < h2 { (&h1, &h2) } else { (&h2, &h1) };
    assert_eq!(root, hash_bytes(format!("{}{}", low, high).as_bytes()));

    let proof = tree.generate_proof(&h1).unwrap();
    assert_eq!(proof, Proof::new(vec![h2.clone()]));
    assert!(verify_proof(&h1, &proof, &root));
    assert!(!verify_proof(&h1, &proof, &hash_bytes(b"deadbeef")));
}

#[test]
fn test_proof_survives_wire_format() {
    let leaves = digests(5);
    let tree = MerkleTree::from_leaves(leaves.clone());
    let proof = tree.generate_proof(&leaves[4]).unwrap();

    let json = serde_json::to_string(&proof).unwrap();
    let parsed: Proof = serde_json::from_str(&json).unwrap();
    assert!(verify_proof(&leaves[4], &parsed, tree.root_digest().unwrap()));

    let corrupted = json.replacen('"', "\"X", 1);
    assert!(serde_json::from_str::<Proof>(&corrupted).is_err());
}

#[test]
fn test_verification_across_threads() {
    let leaves = digests(9);
    let tree = MerkleTree::from_leaves(leaves.clone());
    let root = tree.root_digest().unwrap().clone();
    let proofs: Vec<(Digest, Proof)> = leaves
        .iter()
        .map(|leaf| (leaf.clone(), tree.generate_proof(leaf).unwrap()))
        .collect();

    let handles: Vec<_> = proofs
        .into_iter()
        .map(|(leaf, proof)| {
            let root = root.clone();
            std::thread::spawn(move || verify_proof(&leaf, &proof, &root))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
