//! Type size reports, used to keep an eye on how much a search allocates per
//! node.

use std::io::Write;
use std::mem::size_of;

use crate::algorithms::frontier::RankedNode;
use crate::search::NodeIndex;
use crate::search::SearchNode;
use crate::space::Coordinate;
use crate::space::Direction;
use crate::space::HeuristicCost;

const AVG_CACHELINE_SIZE: usize = 64;

/// Returns [`std::any::type_name`] with every path shortened to its last
/// segment, `alloc::vec::Vec<robot_nav::space::Coordinate>` becomes
/// `Vec<Coordinate>`.
pub fn type_name<T: ?Sized>() -> String {
    short_type_name(std::any::type_name::<T>())
}

fn short_type_name(name: &str) -> String {
    let mut short = String::with_capacity(name.len());
    let mut segment = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
            continue;
        }
        short.push_str(segment.rsplit("::").next().unwrap_or_default());
        segment.clear();
        short.push(c);
    }
    short.push_str(segment.rsplit("::").next().unwrap_or_default());
    short
}

/// Writes one org table row with the size of `T`.
pub fn write_type_size<T, W: Write>(out: &mut W) -> std::io::Result<()> {
    let t_type = format!("~{}~", type_name::<T>());
    let size = size_of::<T>();
    let per_cacheline = AVG_CACHELINE_SIZE.checked_div(size).unwrap_or(0);
    writeln!(out, "| {t_type:40} | {size:10} | {per_cacheline:10} |")
}

/// Writes an org table with the sizes of the types a search allocates.
pub fn write_type_sizes<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "| Type | Size (B) | Per cacheline |")?;
    writeln!(out, "|------+----------+---------------|")?;
    write_type_size::<Coordinate, _>(out)?;
    write_type_size::<Direction, _>(out)?;
    write_type_size::<Option<Direction>, _>(out)?;
    write_type_size::<HeuristicCost, _>(out)?;
    write_type_size::<NodeIndex, _>(out)?;
    write_type_size::<Option<NodeIndex>, _>(out)?;
    write_type_size::<SearchNode, _>(out)?;
    write_type_size::<RankedNode, _>(out)?;
    Ok(())
}
