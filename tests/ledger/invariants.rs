//! Property tests over random operation sequences
//!
//! Counts never go negative and, absent check-ins and returns,
//! `count + reserved` is constant.

use crate::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Sell(u8),
    CheckIn(u8, bool),
    Return(u8, u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..3).prop_map(Op::Sell),
        1 => (0u8..3, any::<bool>()).prop_map(|(i, d)| Op::CheckIn(i, d)),
        1 => (0u8..3, 0u8..3).prop_map(|(i, d)| Op::Return(i, d)),
    ]
}

fn key(i: u8) -> String {
    format!("item-{}", i)
}

proptest! {
    #[test]
    fn sales_conserve_units(initial in 0u64..20, sells in proptest::collection::vec(0u8..3, 0..60)) {
        let db = create_db();
        for i in 0..3u8 {
            db.stock.seed(key(i), "P", initial).unwrap();
        }
        for i in sells {
            db.sales.sell(key(i)).unwrap();
        }
        for i in 0..3u8 {
            let rec = db.stock.get(key(i)).unwrap();
            prop_assert_eq!(rec.count + rec.reserved, initial);
        }
    }

    #[test]
    fn ledger_tracks_a_model(ops in proptest::collection::vec(op(), 0..80)) {
        let db = create_db();
        // (count, reserved) per key; None until created
        let mut model: [Option<(u64, u64)>; 3] = [None; 3];
        let mut repair = [0u64; 3];
        let mut trash = [0u64; 3];

        for op in ops {
            match op {
                Op::Sell(i) => {
                    let sold = db.sales.sell(key(i)).unwrap().is_sold();
                    let slot = &mut model[i as usize];
                    let expected = matches!(slot, Some((c, _)) if *c > 0);
                    prop_assert_eq!(sold, expected);
                    if let Some((c, r)) = slot.as_mut() {
                        if sold {
                            *c -= 1;
                            *r += 1;
                        }
                    }
                }
                Op::CheckIn(i, defective) => {
                    db.stock.check_in(key(i), defective).unwrap();
                    let slot = &mut model[i as usize];
                    if !defective {
                        match slot.as_mut() {
                            Some((c, _)) => *c += 1,
                            None => *slot = Some((1, 0)),
                        }
                    }
                }
                Op::Return(i, dest) => {
                    let destination = [
                        ReturnDestination::Shelf,
                        ReturnDestination::Repair,
                        ReturnDestination::Trash,
                    ][dest as usize];
                    let out = db.stock.process_return(key(i), destination).unwrap();
                    match destination {
                        ReturnDestination::Shelf => match model[i as usize].as_mut() {
                            Some((c, _)) => {
                                prop_assert!(out.is_success());
                                *c += 1;
                            }
                            None => prop_assert!(!out.is_success()),
                        },
                        ReturnDestination::Repair => repair[i as usize] += 1,
                        ReturnDestination::Trash => trash[i as usize] += 1,
                    }
                }
            }
        }

        for i in 0..3u8 {
            match model[i as usize] {
                Some((c, r)) => {
                    let rec = db.stock.get(key(i)).unwrap();
                    prop_assert_eq!((rec.count, rec.reserved), (c, r));
                }
                None => prop_assert!(db.stock.get(key(i)).unwrap_err().is_not_found()),
            }
            prop_assert_eq!(db.stock.bin_count(Bin::Repair, key(i)), repair[i as usize]);
            prop_assert_eq!(db.stock.bin_count(Bin::Trash, key(i)), trash[i as usize]);
        }
    }
}
