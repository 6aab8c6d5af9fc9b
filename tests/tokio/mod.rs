mod asyncbufreader;
