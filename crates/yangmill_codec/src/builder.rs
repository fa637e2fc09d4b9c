//! Reconstructing a normalized tree from serialization events.

use std::sync::Arc;

use yangmill_foundation::{Error, QName, QNameModule, Result};
use yangmill_model::Value;

use crate::normalized::NormalizedNode;
use crate::stream::BindingStreamWriter;

/// One open node on the builder's stack.
enum Frame {
    Container {
        qname: QName,
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    Map {
        qname: QName,
        entries: im::Vector<Arc<NormalizedNode>>,
    },
    MapEntry {
        qname: QName,
        key: Vec<(QName, Value)>,
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    UnkeyedList {
        qname: QName,
        entries: im::Vector<Arc<NormalizedNode>>,
    },
    UnkeyedListItem {
        qname: QName,
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    Choice {
        qname: QName,
        case: Option<QName>,
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    /// Transparent: children merge into the enclosing choice on end.
    Case {
        qname: QName,
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    /// Transparent: children merge into the enclosing node on end.
    Augmentation {
        module: QNameModule,
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
}

/// A [`BindingStreamWriter`] that rebuilds the emitted structure as a
/// [`NormalizedNode`] tree.
///
/// Augmentation and case frames are transparent: their children land in
/// the enclosing node, matching the normalized tree's inlined view, while
/// the active case name is recorded on its choice.
#[derive(Default)]
pub struct NormalizedTreeBuilder {
    stack: Vec<Frame>,
    result: Option<Arc<NormalizedNode>>,
}

impl NormalizedTreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the finished tree.
    ///
    /// # Errors
    /// Returns a verification error if the event stream was unbalanced
    /// or empty.
    pub fn build(self) -> Result<Arc<NormalizedNode>> {
        if !self.stack.is_empty() {
            return Err(Error::verify(format!(
                "event stream ended with {} unclosed node(s)",
                self.stack.len()
            )));
        }
        self.result
            .ok_or_else(|| Error::verify("event stream produced no nodes"))
    }

    fn push(&mut self, frame: Frame) {
        self.stack.push(frame);
    }

    /// Attaches a finished node to the innermost open frame.
    fn attach(&mut self, node: Arc<NormalizedNode>) -> Result<()> {
        match self.stack.last_mut() {
            None => {
                if self.result.is_some() {
                    return Err(Error::verify("multiple root nodes emitted"));
                }
                self.result = Some(node);
                Ok(())
            }
            Some(
                Frame::Container { children, .. }
                | Frame::MapEntry { children, .. }
                | Frame::UnkeyedListItem { children, .. }
                | Frame::Choice { children, .. }
                | Frame::Case { children, .. }
                | Frame::Augmentation { children, .. },
            ) => {
                children.insert(node.qname().clone(), node);
                Ok(())
            }
            Some(Frame::Map { entries, .. } | Frame::UnkeyedList { entries, .. }) => {
                entries.push_back(node);
                Ok(())
            }
        }
    }

    /// Merges transparent-frame children into the enclosing frame.
    fn merge_children(
        &mut self,
        merged: im::OrdMap<QName, Arc<NormalizedNode>>,
    ) -> Result<()> {
        match self.stack.last_mut() {
            Some(
                Frame::Container { children, .. }
                | Frame::MapEntry { children, .. }
                | Frame::UnkeyedListItem { children, .. }
                | Frame::Choice { children, .. }
                | Frame::Case { children, .. }
                | Frame::Augmentation { children, .. },
            ) => {
                for (qname, node) in merged {
                    children.insert(qname, node);
                }
                Ok(())
            }
            _ => Err(Error::verify(
                "transparent node closed outside a container-like parent",
            )),
        }
    }
}

impl BindingStreamWriter for NormalizedTreeBuilder {
    fn start_container(&mut self, qname: QName) -> Result<()> {
        self.push(Frame::Container {
            qname,
            children: im::OrdMap::new(),
        });
        Ok(())
    }

    fn start_map(&mut self, qname: QName) -> Result<()> {
        self.push(Frame::Map {
            qname,
            entries: im::Vector::new(),
        });
        Ok(())
    }

    fn start_map_entry(&mut self, qname: QName, key: Vec<(QName, Value)>) -> Result<()> {
        self.push(Frame::MapEntry {
            qname,
            key,
            children: im::OrdMap::new(),
        });
        Ok(())
    }

    fn start_unkeyed_list(&mut self, qname: QName) -> Result<()> {
        self.push(Frame::UnkeyedList {
            qname,
            entries: im::Vector::new(),
        });
        Ok(())
    }

    fn start_unkeyed_list_item(&mut self, qname: QName) -> Result<()> {
        self.push(Frame::UnkeyedListItem {
            qname,
            children: im::OrdMap::new(),
        });
        Ok(())
    }

    fn start_choice(&mut self, qname: QName) -> Result<()> {
        self.push(Frame::Choice {
            qname,
            case: None,
            children: im::OrdMap::new(),
        });
        Ok(())
    }

    fn start_case(&mut self, qname: QName) -> Result<()> {
        if !matches!(self.stack.last(), Some(Frame::Choice { .. })) {
            return Err(Error::verify("case opened outside a choice"));
        }
        self.push(Frame::Case {
            qname,
            children: im::OrdMap::new(),
        });
        Ok(())
    }

    fn start_augmentation(&mut self, module: QNameModule) -> Result<()> {
        if self.stack.is_empty() {
            return Err(Error::verify("augmentation opened at the root"));
        }
        self.push(Frame::Augmentation {
            module,
            children: im::OrdMap::new(),
        });
        Ok(())
    }

    fn leaf(&mut self, qname: QName, value: Value) -> Result<()> {
        self.attach(Arc::new(NormalizedNode::Leaf { qname, value }))
    }

    fn leaf_list(&mut self, qname: QName, values: Vec<Value>) -> Result<()> {
        self.attach(Arc::new(NormalizedNode::LeafSet {
            qname,
            values: values.into_iter().collect(),
        }))
    }

    fn end_node(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::verify("end_node without an open node"))?;
        match frame {
            Frame::Container { qname, children } => {
                self.attach(Arc::new(NormalizedNode::Container { qname, children }))
            }
            Frame::Map { qname, entries } => {
                self.attach(Arc::new(NormalizedNode::Map { qname, entries }))
            }
            Frame::MapEntry {
                qname,
                key,
                children,
            } => self.attach(Arc::new(NormalizedNode::MapEntry {
                qname,
                key,
                children,
            })),
            Frame::UnkeyedList { qname, entries } => {
                self.attach(Arc::new(NormalizedNode::UnkeyedList { qname, entries }))
            }
            Frame::UnkeyedListItem { qname, children } => {
                self.attach(Arc::new(NormalizedNode::UnkeyedListItem { qname, children }))
            }
            Frame::Choice {
                qname,
                case,
                children,
            } => self.attach(Arc::new(NormalizedNode::Choice {
                qname,
                case,
                children,
            })),
            Frame::Case { qname, children } => {
                match self.stack.last_mut() {
                    Some(Frame::Choice { case, .. }) => *case = Some(qname),
                    _ => {
                        return Err(Error::verify("case closed outside a choice"));
                    }
                }
                self.merge_children(children)
            }
            Frame::Augmentation { module: _, children } => self.merge_children(children),
        }
    }
}
