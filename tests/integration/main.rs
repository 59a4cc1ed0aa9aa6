//! Integration tests for jupyter-deploy
//!
//! These tests spawn the actual binary against a throwaway home directory.
//! They only cover paths that stop before podman or systemctl would run.
