//! Canonical SMILES writer.
//!
//! Atoms are ranked by their invariants (degree, element, isotope, charge, hydrogens,
//! aromaticity), the ranks are refined with the ranks of the neighbours until the partition is
//! stable, and remaining ties are broken one at a time. The molecule is then written depth first
//! from the lowest ranked atom of every component, visiting neighbours in rank order.
//! Stereo information is not written.
use crate::Toolkit::smiles::{Atom, BondOrder, MolGraph, implicit_hydrogens};
use std::collections::HashMap;

const ORGANIC_SUBSET: [&str; 10] = ["B", "C", "N", "O", "P", "S", "F", "Cl", "Br", "I"];
const AROMATIC_SUBSET: [&str; 6] = ["B", "C", "N", "O", "P", "S"];

fn dense_rank<T: Ord + Clone>(keys: &[T]) -> Vec<usize> {
    let mut sorted = keys.to_vec();
    sorted.sort();
    sorted.dedup();
    keys.iter()
        .map(|key| sorted.partition_point(|k| k < key))
        .collect()
}

fn distinct(ranks: &[usize]) -> usize {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

fn refine(
    graph: &MolGraph,
    neighbors: &[Vec<(usize, usize)>],
    mut ranks: Vec<usize>,
) -> Vec<usize> {
    loop {
        let classes = distinct(&ranks);
        let signatures: Vec<(usize, Vec<(usize, u8)>)> = (0..graph.atoms.len())
            .map(|atom| {
                let mut around: Vec<(usize, u8)> = neighbors[atom]
                    .iter()
                    .map(|&(other, bond)| (ranks[other], graph.bonds[bond].order.valence()))
                    .collect();
                around.sort();
                (ranks[atom], around)
            })
            .collect();
        let refined = dense_rank(&signatures);
        if distinct(&refined) == classes {
            return refined;
        }
        ranks = refined;
    }
}

/// Canonical rank of every atom, all distinct.
pub fn canonical_ranks(graph: &MolGraph) -> Vec<usize> {
    let neighbors: Vec<Vec<(usize, usize)>> =
        (0..graph.atoms.len()).map(|atom| graph.neighbors(atom)).collect();
    let invariants: Vec<(usize, u8, u16, i32, u8, bool)> = graph
        .atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            (
                neighbors[i].len(),
                atom.atomic_number,
                atom.isotope.unwrap_or(0),
                atom.charge,
                atom.hydrogens,
                atom.aromatic,
            )
        })
        .collect();
    let mut ranks = refine(graph, &neighbors, dense_rank(&invariants));

    while distinct(&ranks) < ranks.len() {
        // lowest rank still shared by several atoms
        let mut members: HashMap<usize, usize> = HashMap::new();
        for &rank in ranks.iter() {
            *members.entry(rank).or_insert(0) += 1;
        }
        let Some(tied) = members
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(&rank, _)| rank)
            .min()
        else {
            break;
        };
        let Some(chosen) = ranks.iter().position(|&rank| rank == tied) else {
            break;
        };
        let split: Vec<usize> = ranks
            .iter()
            .enumerate()
            .map(|(atom, &rank)| 2 * rank + usize::from(rank == tied && atom != chosen))
            .collect();
        ranks = refine(graph, &neighbors, dense_rank(&split));
    }
    ranks
}

struct Traversal {
    visited: Vec<bool>,
    ring_seen: Vec<bool>,
    children: Vec<Vec<(usize, usize)>>,
    ring_bonds: Vec<Vec<usize>>,
}

impl Traversal {
    fn visit(
        &mut self,
        graph: &MolGraph,
        ranks: &[usize],
        atom: usize,
        parent_bond: Option<usize>,
    ) {
        self.visited[atom] = true;
        let mut around = graph.neighbors(atom);
        around.sort_by_key(|&(other, _)| ranks[other]);
        for (other, bond) in around {
            if Some(bond) == parent_bond {
                continue;
            }
            if self.visited[other] {
                if !self.ring_seen[bond] {
                    self.ring_seen[bond] = true;
                    self.ring_bonds[atom].push(bond);
                    self.ring_bonds[other].push(bond);
                }
            } else {
                self.children[atom].push((other, bond));
                self.visit(graph, ranks, other, Some(bond));
            }
        }
    }
}

struct Writer<'a> {
    graph: &'a MolGraph,
    traversal: &'a Traversal,
    open_rings: HashMap<usize, u16>,
    out: String,
}

impl Writer<'_> {
    fn write(&mut self, atom: usize, parent_bond: Option<usize>) {
        if let Some(bond) = parent_bond {
            self.out.push_str(bond_symbol(self.graph, bond));
        }
        self.out.push_str(&atom_token(self.graph, atom));
        for &bond in self.traversal.ring_bonds[atom].iter() {
            match self.open_rings.remove(&bond) {
                Some(number) => {
                    self.out.push_str(bond_symbol(self.graph, bond));
                    self.out.push_str(&ring_label(number));
                }
                None => {
                    let number = (1..)
                        .find(|n| !self.open_rings.values().any(|used| used == n))
                        .unwrap_or(1);
                    self.open_rings.insert(bond, number);
                    self.out.push_str(&ring_label(number));
                }
            }
        }
        let children = &self.traversal.children[atom];
        let last = children.len().saturating_sub(1);
        for (k, &(child, bond)) in children.iter().enumerate() {
            if k < last {
                self.out.push('(');
                self.write(child, Some(bond));
                self.out.push(')');
            } else {
                self.write(child, Some(bond));
            }
        }
    }
}

fn ring_label(number: u16) -> String {
    if number < 10 {
        number.to_string()
    } else {
        format!("%{}", number)
    }
}

fn bond_symbol(graph: &MolGraph, bond: usize) -> &'static str {
    let bond = &graph.bonds[bond];
    let both_aromatic = graph.atoms[bond.begin].aromatic && graph.atoms[bond.end].aromatic;
    match bond.order {
        BondOrder::Single if both_aromatic => "-",
        BondOrder::Single => "",
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Quadruple => "$",
        BondOrder::Aromatic if both_aromatic => "",
        BondOrder::Aromatic => ":",
    }
}

fn written_symbol(atom: &Atom) -> String {
    if atom.aromatic {
        atom.symbol.to_lowercase()
    } else {
        atom.symbol.clone()
    }
}

fn atom_token(graph: &MolGraph, index: usize) -> String {
    let atom = &graph.atoms[index];
    if atom.atomic_number == 0
        && atom.charge == 0
        && atom.hydrogens == 0
        && atom.isotope.is_none()
    {
        return "*".to_string();
    }
    let in_subset = if atom.aromatic {
        AROMATIC_SUBSET.contains(&atom.symbol.as_str())
    } else {
        ORGANIC_SUBSET.contains(&atom.symbol.as_str())
    };
    let bare = in_subset
        && atom.isotope.is_none()
        && atom.charge == 0
        && atom.atom_class.is_none()
        && implicit_hydrogens(&atom.symbol, atom.aromatic, graph.bond_order_sum(index))
            == Some(atom.hydrogens);
    if bare {
        return written_symbol(atom);
    }

    let mut token = String::from("[");
    if let Some(isotope) = atom.isotope {
        token.push_str(&isotope.to_string());
    }
    token.push_str(&written_symbol(atom));
    match atom.hydrogens {
        0 => {}
        1 => token.push('H'),
        n => token.push_str(&format!("H{}", n)),
    }
    match atom.charge {
        0 => {}
        1 => token.push('+'),
        -1 => token.push('-'),
        c if c > 0 => token.push_str(&format!("+{}", c)),
        c => token.push_str(&format!("-{}", -c)),
    }
    if let Some(class) = atom.atom_class {
        token.push_str(&format!(":{}", class));
    }
    token.push(']');
    token
}

/// Writes the canonical SMILES of the molecule graph.
pub fn canonical_smiles(graph: &MolGraph) -> String {
    let n = graph.atoms.len();
    let ranks = canonical_ranks(graph);
    let mut traversal = Traversal {
        visited: vec![false; n],
        ring_seen: vec![false; graph.bonds.len()],
        children: vec![Vec::new(); n],
        ring_bonds: vec![Vec::new(); n],
    };
    let mut by_rank: Vec<usize> = (0..n).collect();
    by_rank.sort_by_key(|&atom| ranks[atom]);

    let mut roots = Vec::new();
    for &atom in by_rank.iter() {
        if !traversal.visited[atom] {
            roots.push(atom);
            traversal.visit(graph, &ranks, atom, None);
        }
    }

    let mut components = Vec::with_capacity(roots.len());
    for root in roots {
        let mut writer = Writer {
            graph,
            traversal: &traversal,
            open_rings: HashMap::new(),
            out: String::new(),
        };
        writer.write(root, None);
        components.push(writer.out);
    }
    components.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Toolkit::smiles::parse_smiles;

    fn canonical(smiles: &str) -> String {
        canonical_smiles(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn test_same_molecule_same_string() {
        assert_eq!(canonical("CCO"), "CCO");
        assert_eq!(canonical("OCC"), "CCO");
        assert_eq!(canonical("CC(C)=O"), "CC(C)=O");
        assert_eq!(canonical("O=C(C)C"), "CC(C)=O");
        assert_eq!(canonical("C(=O)O"), "O=CO");
    }

    #[test]
    fn test_rings() {
        assert_eq!(canonical("c1ccccc1"), "c1ccccc1");
        assert_eq!(canonical("C1CCCCC1"), "C1CCCCC1");
        assert_eq!(
            canonical("CC(C)(OO)c1ccccc1"),
            canonical("c1ccc(cc1)C(C)(C)OO")
        );
    }

    #[test]
    fn test_bracket_atoms_survive() {
        assert_eq!(canonical("[NH4+]"), "[NH4+]");
        assert_eq!(canonical("[13CH4]"), "[13CH4]");
        assert_eq!(canonical("[Na+].[Cl-]"), "[Na+].[Cl-]");
        assert_eq!(canonical("[CH4]"), "C");
        assert_eq!(canonical("c1cc[nH]c1"), canonical("[nH]1cccc1"));
    }

    #[test]
    fn test_canonical_string_reparses_to_same_composition() {
        for smiles in ["CC(C)(OO)c1ccccc1", "OC(=O)c1ccccc1O", "C1CC2CCC1CC2", "N#CC=C"] {
            let graph = parse_smiles(smiles).unwrap();
            let rewritten = parse_smiles(&canonical_smiles(&graph)).unwrap();
            assert_eq!(graph.composition(), rewritten.composition());
        }
    }
}
