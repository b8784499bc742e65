//! Sitemap tree rendering
//!
//! A depth-first walk from the root URL prints each page indented by depth,
//! followed by an ASSETS list and then its outgoing links expanded in turn.
//! The link graph is not a tree: a URL already printed in this walk is never
//! printed or expanded again.
//!
//! ```text
//! .
//! └── http://site.test/
//!   │  └── ASSETS
//!   │    └── http://site.test/logo.png
//!   └── http://site.test/a
//! ```

use crate::sitemap::{Sitemap, SitemapAggregator, SitemapEntry};
use std::collections::HashSet;
use std::io::{self, Write};

/// Read access to per-URL sitemap entries
pub trait SitemapView {
    /// Entry for `url`, empty if nothing is recorded
    fn info_for(&self, url: &str) -> SitemapEntry;
}

impl SitemapView for Sitemap {
    fn info_for(&self, url: &str) -> SitemapEntry {
        Sitemap::info_for(self, url)
    }
}

impl SitemapView for SitemapAggregator {
    fn info_for(&self, url: &str) -> SitemapEntry {
        SitemapAggregator::info_for(self, url)
    }
}

/// One page being expanded: its links and how far through them we are
struct Frame {
    links: Vec<String>,
    next: usize,
    depth: usize,
}

/// Writes the sitemap tree rooted at `root`
///
/// The walk keeps its own stack, so deep sites cannot overflow the call stack.
pub fn render_sitemap<V, W>(view: &V, root: &str, out: &mut W) -> io::Result<()>
where
    V: SitemapView + ?Sized,
    W: Write,
{
    writeln!(out, ".")?;

    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<Frame> = Vec::new();

    visited.insert(root.to_string());
    let entry = view.info_for(root);
    write_node(out, &entry, 0)?;
    stack.push(Frame {
        links: entry.outgoing_links.into_iter().collect(),
        next: 0,
        depth: 0,
    });

    while let Some(frame) = stack.last_mut() {
        let Some(link) = frame.links.get(frame.next).cloned() else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let depth = frame.depth + 2;

        if !visited.insert(link.clone()) {
            continue;
        }

        let entry = view.info_for(&link);
        write_node(out, &entry, depth)?;
        stack.push(Frame {
            links: entry.outgoing_links.into_iter().collect(),
            next: 0,
            depth,
        });
    }

    out.flush()
}

/// Renders the sitemap tree into a string
pub fn format_sitemap<V>(view: &V, root: &str) -> String
where
    V: SitemapView + ?Sized,
{
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = render_sitemap(view, root, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_node<W: Write>(out: &mut W, entry: &SitemapEntry, depth: usize) -> io::Result<()> {
    writeln!(out, "{}└── {}", " ".repeat(depth), entry.url)?;

    if entry.assets.is_empty() {
        return Ok(());
    }

    let gutter = " ".repeat(depth + 2);
    let inner = " ".repeat(depth + 4);
    writeln!(out, "{}│{}└── ASSETS", gutter, gutter)?;

    let last = entry.assets.len() - 1;
    for (idx, asset) in entry.assets.iter().enumerate() {
        let marker = if idx == last { "└" } else { "├" };
        writeln!(out, "{}│{}{}── {}", gutter, inner, marker, asset)?;
    }

    Ok(())
}
